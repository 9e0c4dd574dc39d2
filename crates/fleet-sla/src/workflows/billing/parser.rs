use crate::workflows::sla::money::{parse_brl, CurrencyParseError};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct BillingRecord {
    pub(crate) line: u64,
    pub(crate) customer: String,
    pub(crate) plate: String,
    pub(crate) monthly_fee: Result<Decimal, CurrencyParseError>,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<BillingRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record
            .position()
            .map(|position| position.line())
            .unwrap_or_default();
        let row: BillingRow = record.deserialize(Some(&headers))?;
        let Some(plate) = row.plate else {
            continue;
        };

        records.push(BillingRecord {
            line,
            customer: row.customer.unwrap_or_default(),
            plate,
            monthly_fee: row
                .monthly_fee
                .as_deref()
                .map(parse_brl)
                .unwrap_or(Err(CurrencyParseError::Empty)),
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct BillingRow {
    #[serde(rename = "CLIENTE", default, deserialize_with = "empty_string_as_none")]
    customer: Option<String>,
    #[serde(rename = "PLACA", default, deserialize_with = "empty_string_as_none")]
    plate: Option<String>,
    #[serde(
        rename = "VALOR MENSALIDADE",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    monthly_fee: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
