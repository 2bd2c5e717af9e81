use entities::cities::{CityName, EruvStatus, ZipCode};
use entities::subscribers::{PhoneNumber, Subscriber};
use std::collections::HashMap;

/// Data rows start below the header row on every worksheet.
pub(crate) const FIRST_DATA_ROW: u32 = 2;

/// One city's row on the `Status` worksheet.
#[derive(Clone, Debug)]
pub struct StatusRow {
    /// 1-based sheet row, kept so the notified status can be written back.
    pub row: u32,
    pub city: CityName,
    pub current_status: EruvStatus,
    pub last_notified: Option<EruvStatus>,
}

fn cell(row: &[String], column: usize) -> Option<String> {
    row.get(column)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(crate) fn status_rows(values: Vec<Vec<String>>) -> Vec<StatusRow> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let sheet_row = FIRST_DATA_ROW + index as u32;
            let city = cell(&row, 0).and_then(|value| CityName::try_from(value).ok());
            let Some(city) = city else {
                tracing::warn!("Skipping status row {sheet_row} with no city name");
                return None;
            };
            let Some(current_status) = cell(&row, 1).and_then(|value| EruvStatus::try_from(value).ok())
            else {
                tracing::warn!("Skipping status row {sheet_row} ({city}) with no status");
                return None;
            };
            let last_notified = cell(&row, 2).and_then(|value| EruvStatus::try_from(value).ok());
            Some(StatusRow {
                row: sheet_row,
                city,
                current_status,
                last_notified,
            })
        })
        .collect()
}

pub(crate) fn subscriber_rows(values: Vec<Vec<String>>) -> Vec<Subscriber> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let sheet_row = FIRST_DATA_ROW + index as u32;
            let phone_number = match cell(&row, 1).map(PhoneNumber::try_from) {
                Some(Ok(phone_number)) => phone_number,
                Some(Err(error)) => {
                    tracing::warn!("Skipping subscriber row {sheet_row}: {error}");
                    return None;
                }
                None => {
                    tracing::warn!("Skipping subscriber row {sheet_row} with no phone number");
                    return None;
                }
            };
            let cities = cell(&row, 2)
                .map(|cities| {
                    cities
                        .split(',')
                        .filter_map(|city| CityName::try_from(city.to_string()).ok())
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            if cities.is_empty() {
                tracing::warn!("Skipping subscriber row {sheet_row} with no cities");
                return None;
            }
            Some(Subscriber {
                phone_number,
                cities,
            })
        })
        .collect()
}

pub(crate) fn zip_codes(values: Vec<Vec<String>>) -> HashMap<CityName, ZipCode> {
    values
        .into_iter()
        .filter_map(|row| {
            let city = cell(&row, 2).and_then(|value| CityName::try_from(value).ok())?;
            let zip_code = match cell(&row, 3).map(ZipCode::try_from) {
                Some(Ok(zip_code)) => zip_code,
                Some(Err(error)) => {
                    tracing::warn!("Ignoring zip code for {city}: {error}");
                    return None;
                }
                None => return None,
            };
            Some((city, zip_code))
        })
        .collect()
}
