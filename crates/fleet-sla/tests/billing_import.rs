use fleet_sla::workflows::billing::{BillingImportError, CustomerBillingBase};
use rust_decimal_macros::dec;

#[test]
fn importer_reads_the_billing_export() {
    let data = include_bytes!("../Base_Clientes_Faturamento.csv");
    let base = CustomerBillingBase::from_reader(&data[..]).expect("billing base imports");

    assert_eq!(base.len(), 6);

    let cases = [
        ("ABC1D23", "Acme Transportes", dec!(1500.00)),
        ("xyz9k88", "Beta Logística", dec!(3000.00)),
        ("QWE-4R56", "Cargas Rápidas", dec!(2250.50)),
        ("JKL7M89", "Distribuidora Sul", dec!(1800.75)),
        ("MNO2P34", "Expresso Norte", dec!(990)),
    ];
    for (plate, customer, fee) in cases {
        let account = base
            .lookup(plate)
            .unwrap_or_else(|| panic!("plate {plate} present"));
        assert_eq!(account.customer, customer);
        assert_eq!(account.monthly_fee, fee);
    }
}

#[test]
fn repeated_plates_keep_the_first_fee() {
    let data = include_bytes!("../Base_Clientes_Faturamento.csv");
    let base = CustomerBillingBase::from_reader(&data[..]).expect("billing base imports");

    let acme = base.lookup("ABC1D23").expect("acme present");
    assert_eq!(acme.monthly_fee, dec!(1500.00));
}

#[test]
fn importer_rejects_missing_columns_gracefully() {
    let csv = "CLIENTE,PLACA\nAcme,ABC1D23\n";
    let error = CustomerBillingBase::from_reader(csv.as_bytes()).expect_err("fee column missing");
    assert!(matches!(
        error,
        BillingImportError::InvalidMonthlyFee { .. } | BillingImportError::Csv(_)
    ));
}
