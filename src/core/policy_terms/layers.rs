//! Layer discovery: `p_L{n}PL`, `p_L{n}LL`, `p_L{n}AP`, `p_L{n}PP`,
//! `p_L{n}Name`, `p_L{n}PR` for n = 1, 2, ...
//!
//! The scan stops at the first index without a participation range. A layer
//! whose participation works out to nothing is left out, but the scan goes on.

use super::NamedCells;
use crate::config::ExtractConfig;
use crate::excel::Workbook;
use crate::types::{LayerTerms, Participation};
use tracing::debug;

pub const PARTICIPATION: &str = "PL";
pub const LIMIT: &str = "LL";
pub const ATTACHMENT: &str = "AP";
pub const PARTICIPATION_PERCENT: &str = "PP";
pub const NAME: &str = "Name";
pub const PREMIUM: &str = "PR";

pub fn layer_range(index: u32, suffix: &str) -> String {
    format!("p_L{}{}", index, suffix)
}

pub fn read_layers<W: Workbook + ?Sized>(
    cells: &NamedCells<'_, W>,
    config: &ExtractConfig,
) -> Vec<LayerTerms> {
    let total_tiv = cells.number(&config.total_tiv_range);
    let mut layers = Vec::new();

    for index in 1..=config.max_layers {
        if !cells.exists(&layer_range(index, PARTICIPATION)) {
            debug!(index, "No participation range, layer scan ends");
            break;
        }

        let limit = cells.number(&layer_range(index, LIMIT)).or(total_tiv);
        let attachment = cells
            .number(&layer_range(index, ATTACHMENT))
            .unwrap_or(0.0);
        let percent = cells
            .number(&layer_range(index, PARTICIPATION_PERCENT))
            .unwrap_or(1.0);
        let amount = cells.number(&layer_range(index, PARTICIPATION));

        let calculated =
            amount.or_else(|| limit.map(|limit| (limit - attachment.max(0.0)) * percent));
        match calculated {
            Some(participation) if participation != 0.0 => {}
            _ => {
                debug!(index, "Layer has no participation, skipping");
                continue;
            }
        }

        layers.push(LayerTerms {
            name: cells
                .text(&layer_range(index, NAME))
                .unwrap_or_else(|| index.to_string()),
            limit,
            attachment,
            participation: match amount {
                Some(amount) => Participation::amount(amount),
                None => Participation::percent(percent),
            },
            premium: cells.number(&layer_range(index, PREMIUM)),
        });
    }

    layers
}
