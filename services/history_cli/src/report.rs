//! Printable summaries of fetched history accounts

use history_sdk::{Element, OracleHistorySnapshot, RawAccountHistory};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Serialize)]
pub struct AccountHistoryReport {
    pub address: String,
    pub watched_account: String,
    pub close_authority: String,
    pub update_authority: Option<String>,
    pub capacity: usize,
    pub element_size: usize,
    pub num_updates: u64,
    pub min_slot_delay: u32,
    pub min_close_delay: u32,
    pub close_initiated: Option<u64>,
    pub closable_at: Option<u64>,
    pub data_regions: Vec<String>,
    /// Newest first, data hex encoded
    pub elements: Vec<ElementReport>,
}

#[derive(Debug, Serialize)]
pub struct ElementReport {
    pub slot: u64,
    pub data: String,
}

impl From<&Element> for ElementReport {
    fn from(element: &Element) -> Self {
        Self {
            slot: element.slot,
            data: hex::encode(&element.data),
        }
    }
}

impl From<&RawAccountHistory> for AccountHistoryReport {
    fn from(history: &RawAccountHistory) -> Self {
        let header = &history.header;
        Self {
            address: history.address.to_string(),
            watched_account: header.associated_account().to_string(),
            close_authority: header.close_authority().to_string(),
            update_authority: header.update_authority().map(|key| key.to_string()),
            capacity: header.capacity(),
            element_size: header.data_element_size(),
            num_updates: header.num_updates(),
            min_slot_delay: header.min_slot_delay(),
            min_close_delay: header.min_close_delay(),
            close_initiated: header.close_initiated(),
            closable_at: header.closable_at(),
            data_regions: header
                .data_regions()
                .iter()
                .map(|(offset, len)| format!("{offset}:{len}"))
                .collect(),
            elements: history.elements.iter().map(ElementReport::from).collect(),
        }
    }
}

impl fmt::Display for AccountHistoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "History account: {}", self.address)?;
        writeln!(f, "  Watching:         {}", self.watched_account)?;
        writeln!(f, "  Close authority:  {}", self.close_authority)?;
        writeln!(
            f,
            "  Update authority: {}",
            self.update_authority.as_deref().unwrap_or("anyone")
        )?;
        writeln!(f, "  Data regions:     {}", self.data_regions.join(" "))?;
        writeln!(
            f,
            "  Capacity:         {} x {} bytes",
            self.capacity, self.element_size
        )?;
        writeln!(f, "  Updates:          {}", self.num_updates)?;
        writeln!(f, "  Min slot delay:   {}", self.min_slot_delay)?;
        match (self.close_initiated, self.closable_at) {
            (Some(initiated), Some(closable)) => writeln!(
                f,
                "  Closing:          initiated at slot {initiated}, closable from slot {closable}"
            )?,
            _ => writeln!(f, "  Min close delay:  {}", self.min_close_delay)?,
        }
        for element in &self.elements {
            writeln!(f, "  [{}] {}", element.slot, element.data)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct OracleHistoryReport {
    pub address: String,
    pub oracle: String,
    /// Newest first as (slot, price)
    pub prices: Vec<(u64, i64)>,
}

impl From<&OracleHistorySnapshot> for OracleHistoryReport {
    fn from(snapshot: &OracleHistorySnapshot) -> Self {
        Self {
            address: snapshot.address.to_string(),
            oracle: snapshot.associated_oracle().to_string(),
            prices: snapshot
                .values()
                .iter()
                .map(|price| (price.slot, price.price))
                .collect(),
        }
    }
}

impl fmt::Display for OracleHistoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Oracle history: {}", self.address)?;
        writeln!(f, "  Oracle: {}", self.oracle)?;
        for (slot, price) in &self.prices {
            writeln!(f, "  [{slot}] {price}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_report() {
        let element = Element {
            slot: 42,
            data: vec![1, 2, 255],
        };
        let report = ElementReport::from(&element);
        assert_eq!(report.slot, 42);
        assert_eq!(report.data, "0102ff");
    }
}
