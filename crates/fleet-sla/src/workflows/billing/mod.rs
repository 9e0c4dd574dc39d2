//! Customer billing base: which customer owns each plate and what they pay per month.

mod normalizer;
mod parser;

use crate::workflows::sla::money::CurrencyParseError;
pub(crate) use normalizer::normalize_plate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerAccount {
    pub customer: String,
    pub plate: String,
    pub monthly_fee: Decimal,
}

#[derive(Debug)]
pub enum BillingImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidMonthlyFee {
        line: u64,
        plate: String,
        source: CurrencyParseError,
    },
}

impl std::fmt::Display for BillingImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BillingImportError::Io(err) => write!(f, "failed to read billing base: {}", err),
            BillingImportError::Csv(err) => write!(f, "invalid billing CSV data: {}", err),
            BillingImportError::InvalidMonthlyFee {
                line,
                plate,
                source,
            } => write!(
                f,
                "line {}: monthly fee for plate {} is unreadable: {}",
                line, plate, source
            ),
        }
    }
}

impl std::error::Error for BillingImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BillingImportError::Io(err) => Some(err),
            BillingImportError::Csv(err) => Some(err),
            BillingImportError::InvalidMonthlyFee { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for BillingImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for BillingImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Plate-indexed view over the billing spreadsheet export.
#[derive(Debug, Clone, Default)]
pub struct CustomerBillingBase {
    accounts: Vec<CustomerAccount>,
    by_plate: HashMap<String, usize>,
}

impl CustomerBillingBase {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, BillingImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Reads `CLIENTE`, `PLACA` and `VALOR MENSALIDADE` columns. Rows without a plate are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, BillingImportError> {
        let mut accounts = Vec::new();

        for record in parser::parse_records(reader)? {
            let monthly_fee =
                record
                    .monthly_fee
                    .map_err(|source| BillingImportError::InvalidMonthlyFee {
                        line: record.line,
                        plate: record.plate.clone(),
                        source,
                    })?;

            accounts.push(CustomerAccount {
                customer: record.customer,
                plate: normalize_plate(&record.plate),
                monthly_fee,
            });
        }

        Ok(Self::from_accounts(accounts))
    }

    /// Builds the index; when a plate repeats, the first row wins.
    pub fn from_accounts(accounts: Vec<CustomerAccount>) -> Self {
        let mut by_plate = HashMap::new();
        for (index, account) in accounts.iter().enumerate() {
            by_plate
                .entry(normalize_plate(&account.plate))
                .or_insert(index);
        }

        Self { accounts, by_plate }
    }

    pub fn lookup(&self, plate: &str) -> Option<&CustomerAccount> {
        self.by_plate
            .get(&normalize_plate(plate))
            .and_then(|index| self.accounts.get(*index))
    }

    pub fn accounts(&self) -> &[CustomerAccount] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
