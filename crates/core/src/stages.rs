// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Stage progression: purchase quotas and the four-tire carry-over.

use crate::apply::Transition;
use crate::command::PurchaseInput;
use crate::error::CoreError;
use crate::sets::release_members;
use crate::state::{Change, Outcome, State};
use std::collections::BTreeSet;
use time::Date;
use tire_ledger_domain::{
    Car, DomainError, IdGenerator, RETAINED_PER_STAGE, SeasonPolicy, SetStatus, StageRecord,
    StageStatus, Tire, TireSet, TireStatus, calendar_entry, default_tire_prefix, validate_tire,
};

/// Buys `count` tires for a car in the open stage.
///
/// Tires are named `<prefix><number>` with numbers counting up from
/// `start_number`, and get a barcode of `<stage><number>`.
pub(crate) fn purchase<G: IdGenerator>(
    tx: &mut Transition,
    policy: &SeasonPolicy,
    ids: &G,
    input: PurchaseInput,
) -> Result<Outcome, CoreError> {
    policy.validate_stage(input.stage)?;
    if input.stage != tx.state.current_stage {
        return Err(CoreError::InvalidState {
            entity: "stage",
            id: input.stage.to_string(),
            reason: format!(
                "purchases go to the open stage {}",
                tx.state.current_stage
            ),
        });
    }
    if input.count == 0 {
        return Err(DomainError::InvalidPurchaseCount { count: 0 }.into());
    }

    let car: &Car = tx.state.car(&input.car).ok_or_else(|| CoreError::NotFound {
        entity: "car",
        id: input.car.clone(),
    })?;
    if !car.active {
        return Err(CoreError::InvalidState {
            entity: "car",
            id: input.car.clone(),
            reason: "car is inactive".to_string(),
        });
    }

    let quota: u32 = policy.quota_for(input.stage);
    let already: u32 = tx.state.purchased_in_stage(input.stage);
    if already.saturating_add(input.count) > quota {
        return Err(CoreError::QuotaExceeded {
            stage: input.stage,
            quota,
            already,
            requested: input.count,
        });
    }

    let prefix: String = input
        .prefix
        .clone()
        .unwrap_or_else(|| default_tire_prefix(input.stage));
    let start: u32 = input.start_number.unwrap_or(already + 1);

    let mut tires: Vec<Tire> = Vec::new();
    for offset in 0..input.count {
        let number: u32 = start.saturating_add(offset);
        let tire_id: String = ids.format(&prefix, number);
        if tx.state.tire(&tire_id).is_some() || tires.iter().any(|t| t.tire_id == tire_id) {
            return Err(CoreError::DuplicateKey {
                entity: "tire",
                id: tire_id,
            });
        }
        let mut tire: Tire = Tire::new(
            &tire_id,
            input.category,
            input.date,
            input.distance_limit,
            input.stage,
        );
        tire.car = Some(input.car.clone());
        tire.barcode = Some(ids.barcode(input.stage, number));
        tire.initial_depth = input.initial_depth;
        validate_tire(&tire)?;
        tires.push(tire);
    }

    let tire_ids: Vec<String> = tires.iter().map(|t| t.tire_id.clone()).collect();
    for tire in tires {
        tx.push(Change::InsertTire(tire));
    }
    Ok(Outcome::TiresPurchased { tire_ids })
}

/// Tires of the open stage that may be carried into the next one.
#[must_use]
pub fn eligible_for_carry_over(state: &State) -> Vec<&Tire> {
    state
        .tires
        .iter()
        .filter(|t| {
            t.current_stage == state.current_stage
                && matches!(t.status, TireStatus::Available | TireStatus::InUse)
        })
        .collect()
}

/// Closes the open stage.
///
/// Exactly four eligible tires move to the next stage as `available`;
/// every other tire of the closing stage is discarded. All active sets are
/// disassembled first, since no set survives a stage change.
pub(crate) fn advance(
    tx: &mut Transition,
    policy: &SeasonPolicy,
    selected: &[String],
    end_date: Date,
) -> Result<Outcome, CoreError> {
    let stage: u8 = tx.state.current_stage;
    if policy.is_final(stage) {
        return Err(CoreError::TerminalStage { stage });
    }

    let chosen: BTreeSet<&str> = selected.iter().map(String::as_str).collect();
    if selected.len() != RETAINED_PER_STAGE || chosen.len() != RETAINED_PER_STAGE {
        return Err(CoreError::InvalidSelection {
            reason: format!(
                "select exactly {RETAINED_PER_STAGE} distinct tires, got {}",
                chosen.len()
            ),
        });
    }
    let eligible: BTreeSet<&str> = eligible_for_carry_over(&tx.state)
        .into_iter()
        .map(|t| t.tire_id.as_str())
        .collect();
    if let Some(bad) = chosen.iter().find(|id| !eligible.contains(*id)) {
        return Err(CoreError::InvalidSelection {
            reason: format!(
                "tire '{bad}' is not an available or in-use tire of stage {stage}"
            ),
        });
    }
    let chosen: BTreeSet<String> = chosen.into_iter().map(str::to_string).collect();

    let active: Vec<TireSet> = tx
        .state
        .sets
        .iter()
        .filter(|s| s.is_active())
        .cloned()
        .collect();
    for mut set in active {
        release_members(tx, &set);
        set.status = SetStatus::Disassembled;
        tx.push(Change::UpdateSet(set));
    }

    let closing: Vec<Tire> = tx
        .state
        .tires
        .iter()
        .filter(|t| t.current_stage == stage && !t.status.is_terminal())
        .cloned()
        .collect();
    let mut discarded: u32 = 0;
    for mut tire in closing {
        if chosen.contains(&tire.tire_id) {
            tire.current_stage = stage + 1;
            tire.status = TireStatus::Available;
        } else {
            tire.status
                .validate_transition(&tire.tire_id, TireStatus::Discarded)?;
            tire.status = TireStatus::Discarded;
            discarded += 1;
        }
        tx.push(Change::UpdateTire(tire));
    }

    let record: StageRecord = StageRecord {
        stage,
        start_date: calendar_entry(stage).map(|e| e.date),
        end_date: Some(end_date),
        tires_purchased: tx.state.purchased_in_stage(stage),
        retained: selected.to_vec(),
        discarded,
        status: StageStatus::Closed,
    };
    tx.push(Change::InsertStageRecord(record.clone()));
    tx.push(Change::SetCurrentStage(stage + 1));

    Ok(Outcome::StageAdvanced { record })
}

/// Summary of the open stage, computed from the registry.
#[must_use]
pub fn open_stage_summary(state: &State) -> StageRecord {
    StageRecord {
        stage: state.current_stage,
        start_date: calendar_entry(state.current_stage).map(|e| e.date),
        end_date: None,
        tires_purchased: state.purchased_in_stage(state.current_stage),
        retained: Vec::new(),
        discarded: 0,
        status: StageStatus::Open,
    }
}
