/*
 * Helios Toolkit
 * Copyright (C) 2023-onward the Helios contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use tabled::{settings::Style, Table, Tabled};

use crate::naif::SPK;
use crate::time::JulianDate;

#[derive(Tabled)]
pub struct SpkRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Target")]
    pub target: i32,
    #[tabled(rename = "Center")]
    pub center: i32,
    #[tabled(rename = "Frame")]
    pub frame: i32,
    #[tabled(rename = "Data type")]
    pub data_type: String,
    #[tabled(rename = "Start")]
    pub start: String,
    #[tabled(rename = "End")]
    pub end: String,
}

impl SPK {
    /// Renders the segment catalog as a table, one row per segment in catalog order.
    pub fn describe(&self) -> String {
        let mut rows = Vec::new();
        for summary in self.summaries() {
            if summary.is_empty() {
                continue;
            }
            rows.push(SpkRow {
                name: summary.name.clone(),
                target: summary.target_id,
                center: summary.center_id,
                frame: summary.frame_id,
                data_type: summary
                    .data_type()
                    .map(|dt| dt.to_string())
                    .unwrap_or_else(|_| format!("unsupported ({})", summary.data_type_i)),
                start: format!(
                    "{}",
                    JulianDate::from_et_seconds(summary.start_epoch_et_s)
                ),
                end: format!("{}", JulianDate::from_et_seconds(summary.end_epoch_et_s)),
            });
        }

        let mut tbl = Table::new(rows);
        tbl.with(Style::rounded());
        format!("{tbl}")
    }
}
