//! Narration - Turn results into battle text
//!
//! Everything here is a pure function of its inputs: formatting the same
//! report twice gives the same text.

use crate::combat::{EffectResult, EffectTag, Exchange, StatLabel};

/// Stance transition that happened as part of an action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StanceChange {
    #[default]
    Unchanged,
    /// Entered the defensive stance
    Entered,
    /// Defended again while already defending
    Continued,
    /// Left the defensive stance to act
    Left,
}

/// Everything needed to narrate one player action
#[derive(Debug, Clone, PartialEq)]
pub struct ActionReport {
    pub source: String,
    pub target: String,
    /// Verb phrase with a leading space, e.g. `" attacks Slime with Longsword"`
    pub description: String,
    pub result: EffectResult,
    pub stance: StanceChange,
}

/// Format a number with `digits` significant digits
///
/// Matches the usual `toPrecision` rules: ties round away from zero, and
/// exponential notation is used when the exponent is below -6 or at least
/// the digit count.
pub fn to_precision(value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return format!("{:.*}", digits - 1, 0.0);
    }

    let precision = digits as i32;
    let magnitude = value.abs();
    let mut exponent = magnitude.log10().floor() as i32;
    let mut scaled = round_at(magnitude, precision - 1 - exponent);
    // log10 can land one off near powers of ten, and rounding can carry
    if scaled >= 10f64.powi(precision) {
        exponent += 1;
        scaled = round_at(magnitude, precision - 1 - exponent);
    } else if scaled < 10f64.powi(precision - 1) {
        exponent -= 1;
        scaled = round_at(magnitude, precision - 1 - exponent);
    }
    let sign = if value < 0.0 { "-" } else { "" };

    if exponent < -6 || exponent >= precision {
        let mantissa = scaled / 10f64.powi(precision - 1);
        let exponent_sign = if exponent < 0 { '-' } else { '+' };
        let decimals = digits - 1;
        format!(
            "{sign}{mantissa:.decimals$}e{exponent_sign}{}",
            exponent.abs()
        )
    } else {
        let shift = (precision - 1 - exponent).max(0);
        let rounded = scaled / 10f64.powi(shift);
        let decimals = shift as usize;
        format!("{sign}{rounded:.decimals$}")
    }
}

/// `value × 10^shift`, rounded half away from zero
fn round_at(value: f64, shift: i32) -> f64 {
    (value * 10f64.powi(shift)).round()
}

/// Shortest plain rendering of a number (`7`, `7.5`)
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Avoid "-0"
        return "0".to_string();
    }
    value.to_string()
}

/// Two significant digits of a gain, shown as a positive number
fn gain_amount(applied: f64) -> String {
    let rounded = to_precision(applied, 2);
    let parsed: f64 = rounded.parse().unwrap_or(applied);
    format_number(-parsed)
}

/// Sentence for one action taken by a player-controlled entity
pub fn action_text(report: &ActionReport) -> String {
    let name = &report.source;
    let target = &report.target;
    let result = &report.result;

    if result.tag == EffectTag::Defend {
        return match report.stance {
            StanceChange::Continued => format!("{name} continues to defend."),
            _ => format!("{name} enters a defensive stance!"),
        };
    }

    let mut text = name.clone();
    if report.stance == StanceChange::Left {
        text.push_str(" leaves their defensive stance and");
    }

    let stat = result.stat.label();
    match result.tag {
        EffectTag::Steal => push_steal_text(&mut text, result.target, target),
        EffectTag::Scan => {
            text.push_str(&report.description);
            text.push_str(&format!(". {target}'s stats are revealed!"));
        }
        _ => {
            text.push_str(&report.description);
            let applied = result.target.applied;
            if applied > 0.0 {
                text.push_str(&format!(
                    ". {target} lost {} {stat}.",
                    to_precision(applied, 2)
                ));
            } else if applied < 0.0 {
                text.push_str(&format!(". {target} gained {} {stat}.", gain_amount(applied)));
            } else {
                text.push_str(", but it had no effect!");
            }
        }
    }

    let returned = result.source;
    if returned.offered != 0.0 {
        if returned.applied > 0.0 {
            text.push_str(&format!(
                " {name} lost {} {stat} in return!",
                format_number(returned.applied)
            ));
        } else {
            text.push_str(&format!(
                " {name} gained {} {stat} in return!",
                format_number(-returned.applied)
            ));
        }
    }
    text
}

/// Steal outcome: `offered` is the gold taken, `applied` the item outcome
/// (0 none, 1 stolen, 2 target had no items)
fn push_steal_text(text: &mut String, outcome: Exchange, target: &str) {
    let gold = outcome.offered;
    let item = outcome.applied;

    if gold == 0.0 && item == 0.0 {
        text.push_str(" failed to steal");
    } else if gold > 0.0 {
        text.push_str(&format!(" stole {} gold", format_number(gold)));
        if item > 0.0 {
            text.push_str(" and also");
        }
    }

    if item == 1.0 {
        text.push_str(&format!(" stole an item from {target}!"));
    } else if item == 2.0 {
        text.push_str(&format!(" tried to steal an item, but {target} has no items!"));
    }
}

/// Line for one firing of a continuous effect
pub fn effect_text(target: &str, exchange: Exchange, stat: StatLabel, effect_name: &str) -> String {
    let stat = stat.label();
    if exchange.applied > 0.0 {
        format!(
            "{target} lost {} {stat} from {effect_name}",
            to_precision(exchange.applied, 2)
        )
    } else if exchange.applied < 0.0 {
        format!(
            "{target} gained {} {stat} from {effect_name}",
            gain_amount(exchange.applied)
        )
    } else {
        format!("{target} was unaffected by {effect_name}")
    }
}

// === AI lines ===

pub fn ai_attack_text(name: &str, target: &str, dealt: f64, damage_label: &str) -> String {
    format!(
        "{name} attacks {target}, dealing {} {damage_label} damage!",
        to_precision(dealt, 2)
    )
}

pub fn knocked_out_text(target: &str) -> String {
    format!("{target} falls unconscious. Or perhaps they're dead.")
}

pub fn ai_defend_text(name: &str) -> String {
    format!("{name} enters a defensive stance!")
}

pub fn ai_continue_defend_text(name: &str) -> String {
    format!("{name} continues to defend.")
}

pub fn ai_leave_defense_text(name: &str) -> String {
    format!("{name} leaves its defensive stance.")
}

pub fn idle_text(name: &str) -> String {
    format!("{name} sits idly by.")
}

pub fn unconscious_turn_text(name: &str) -> String {
    format!("{name} is unconscious and cannot act.")
}
