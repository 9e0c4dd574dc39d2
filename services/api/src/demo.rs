use crate::infra::{
    cli_config, load_billing_base, parse_date, parse_money, parse_part,
    InMemoryWorkbenchRepository,
};
use chrono::NaiveDate;
use clap::Args;
use fleet_sla::error::AppError;
use fleet_sla::workflows::billing::{CustomerAccount, CustomerBillingBase};
use fleet_sla::workflows::sla::report::{
    ComparisonReportView, CustomerAccountView, ScenarioReportView,
};
use fleet_sla::workflows::sla::{
    format_brl, CategoryPolicy, ComparisonResult, Part, ScenarioRequest, ServiceCategory,
    SlaEvaluator, SlaService,
};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Date the vehicle entered the shop (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) entry: NaiveDate,
    /// Date the vehicle left the shop (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) exit: NaiveDate,
    /// Service category, e.g. "Corretiva" or "Motor – 15 dias úteis"
    #[arg(long)]
    pub(crate) service: String,
    /// Holidays falling on business days inside the period
    #[arg(long, default_value_t = 0)]
    pub(crate) holidays: i64,
    /// Monthly fee; looked up in the billing base when omitted
    #[arg(long, value_parser = parse_money)]
    pub(crate) monthly_fee: Option<Decimal>,
    /// Customer name shown on the report
    #[arg(long, default_value = "")]
    pub(crate) customer: String,
    /// Vehicle plate used for the billing lookup
    #[arg(long, default_value = "")]
    pub(crate) plate: String,
    /// Extra part as NAME=VALUE; repeat for several parts
    #[arg(long = "part", value_parser = parse_part)]
    pub(crate) parts: Vec<Part>,
    /// Customer billing base export (overrides SLA_BILLING_CSV)
    #[arg(long)]
    pub(crate) billing_csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CustomersArgs {
    /// Customer billing base export (overrides SLA_BILLING_CSV)
    #[arg(long)]
    pub(crate) billing_csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Customer billing base export; a built-in sample is used when omitted
    #[arg(long)]
    pub(crate) billing_csv: Option<PathBuf>,
    /// Also print the comparison as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let config = cli_config()?;
    let EvaluateArgs {
        entry,
        exit,
        service,
        holidays,
        monthly_fee,
        customer,
        plate,
        parts,
        billing_csv,
    } = args;

    let billing = load_billing_base(billing_csv.or(config.sla.billing_csv))?;
    let service_layer = build_service(billing, config.sla.unknown_category);

    let result = service_layer.evaluate(ScenarioRequest {
        customer,
        plate,
        entry_date: entry,
        exit_date: exit,
        holiday_count: holidays,
        service_category: ServiceCategory::parse(&service),
        parts,
        monthly_fee,
    })?;

    println!("SLA evaluation");
    render_scenario(&ScenarioReportView::from_result(1, &result));
    Ok(())
}

pub(crate) fn run_customers(args: CustomersArgs) -> Result<(), AppError> {
    let config = cli_config()?;
    let billing = load_billing_base(args.billing_csv.or(config.sla.billing_csv))?;

    if billing.is_empty() {
        println!("Billing base is empty; pass --billing-csv or set SLA_BILLING_CSV");
        return Ok(());
    }

    println!("Customers and plates ({} accounts)", billing.len());
    for view in billing.accounts().iter().map(CustomerAccountView::from_account) {
        println!("- {} | {} | {}", view.customer, view.plate, view.monthly_fee);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { billing_csv, json } = args;

    let billing = match billing_csv {
        Some(path) => load_billing_base(Some(path))?,
        None => CustomerBillingBase::default(),
    };
    let billing = if billing.is_empty() {
        demo_billing_base()
    } else {
        billing
    };
    let account = billing
        .accounts()
        .first()
        .cloned()
        .unwrap_or_else(demo_account);

    println!("Fleet SLA scenario comparison demo");
    println!(
        "Customer: {} | plate {} | monthly fee {}",
        account.customer,
        account.plate,
        format_brl(account.monthly_fee)
    );

    let service = build_service(billing, CategoryPolicy::Lenient);
    let workbench = service.open_workbench()?;
    let entry = demo_date(1);

    let scenarios = [
        (
            ServiceCategory::Corrective,
            demo_date(8),
            vec![Part::new("Filtro", Decimal::new(5000, 2))],
        ),
        (
            ServiceCategory::Engine,
            demo_date(26),
            vec![Part::new("Bomba d'água", Decimal::new(42000, 2))],
        ),
        (ServiceCategory::Preventive, demo_date(3), Vec::new()),
    ];

    for (category, exit, parts) in scenarios {
        for part in parts {
            service.add_part(&workbench.id, part)?;
        }
        let updated = service.record_scenario(
            &workbench.id,
            ScenarioRequest {
                customer: String::new(),
                plate: account.plate.clone(),
                entry_date: entry,
                exit_date: exit,
                holiday_count: 0,
                service_category: category,
                parts: Vec::new(),
                monthly_fee: None,
            },
        )?;
        println!("- Scenario {} recorded", updated.scenarios().len());
    }

    let (_, comparison) = service.begin_comparison(&workbench.id)?;
    let report = ComparisonReportView::from_comparison(&comparison);
    render_comparison(&comparison, &report);

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(payload) => println!("\nComparison payload:\n{}", payload),
            Err(err) => println!("\nComparison payload unavailable: {}", err),
        }
    }

    Ok(())
}

fn build_service(
    billing: CustomerBillingBase,
    policy: CategoryPolicy,
) -> SlaService<InMemoryWorkbenchRepository> {
    SlaService::new(
        Arc::new(InMemoryWorkbenchRepository::default()),
        SlaEvaluator::new(policy),
        Arc::new(billing),
    )
}

fn demo_date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap_or_default()
}

fn demo_account() -> CustomerAccount {
    CustomerAccount {
        customer: "Acme Transportes".to_string(),
        plate: "ABC1D23".to_string(),
        monthly_fee: Decimal::new(1500, 0),
    }
}

fn demo_billing_base() -> CustomerBillingBase {
    CustomerBillingBase::from_accounts(vec![demo_account()])
}

fn render_scenario(view: &ScenarioReportView) {
    println!(
        "Scenario {}: {} | {} | {}",
        view.scenario_number, view.customer, view.plate, view.service
    );
    println!(
        "  Period {} -> {} | {} holiday(s)",
        view.entry_date, view.exit_date, view.holiday_count
    );
    println!(
        "  Business days {} / SLA {} | excess {} | {}",
        view.business_days_used, view.sla_threshold_days, view.excess_days, view.status_label
    );
    println!(
        "  Monthly fee {} | discount {} | parts {} | final {}",
        view.monthly_fee, view.discount, view.parts_total, view.final_total
    );
    for part in &view.parts {
        println!("    - {}: {}", part.name, part.value);
    }
    for warning in &view.warnings {
        println!("  Warning: {}", warning);
    }
}

fn render_comparison(comparison: &ComparisonResult, report: &ComparisonReportView) {
    println!("\nScenario comparison");
    for (view, premium) in report
        .scenarios
        .iter()
        .zip(comparison.premiums_over_best())
    {
        render_scenario(view);
        if premium > Decimal::ZERO {
            println!("  {} above the best scenario", format_brl(premium));
        }
    }

    println!(
        "\nBest scenario: #{} {} ({}) at {}",
        report.best.scenario_number,
        report.best.service,
        report.best.plate,
        report.best.final_total
    );
}
