//! Tick generation and label formatting.

use super::types::TickFormat;
use crate::scale::Domain;
use num_format::{Locale, ToFormattedString};

/// Round a raw step up to 1, 2, 5 or 10 times a power of ten.
pub fn nice_step(raw: f64) -> f64 {
    const NICE_STEP_BASES: [f64; 4] = [1.0, 2.0, 5.0, 10.0];
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let exp = raw.log10().floor();
    let base = 10.0_f64.powf(exp);
    for &m in &NICE_STEP_BASES {
        if raw <= m * base {
            return m * base;
        }
    }
    base * 10.0
}

/// Round tick values covering `domain`, about `count` of them, with their step.
///
/// A degenerate domain yields its single value.
pub fn ticks(domain: Domain, count: usize) -> (Vec<f64>, f64) {
    if domain.is_degenerate() {
        return (vec![domain.lo], 1.0);
    }
    let step = nice_step(domain.span() / count.max(1) as f64);
    let first = (domain.lo / step).ceil() as i64;
    let last = (domain.hi / step).floor() as i64;
    let values = (first..=last)
        .map(|i| {
            let v = i as f64 * step;
            // Snap away float noise such as 0.30000000000000004.
            if step < 1.0 {
                let places = (-step.log10()).ceil() as i32;
                let f = 10f64.powi(places);
                (v * f).round() / f
            } else {
                v
            }
        })
        .collect();
    (values, step)
}

/// Like [`ticks`], but never finer than whole numbers.
pub fn integer_ticks(domain: Domain, count: usize) -> (Vec<f64>, f64) {
    let (values, step) = ticks(domain, count);
    if step >= 1.0 {
        return (values, step);
    }
    let whole = (domain.lo.ceil() as i64..=domain.hi.floor() as i64)
        .map(|v| v as f64)
        .collect();
    (whole, 1.0)
}

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'),
    }
}

fn decimals_for(step: f64) -> usize {
    let log_step = step.log10();
    if !log_step.is_finite() || log_step >= 0.0 {
        0
    } else {
        (-log_step).ceil() as usize
    }
}

/// Label text for one tick.
pub fn format_tick(value: f64, step: f64, format: TickFormat, locale_tag: &str) -> String {
    match format {
        TickFormat::Silent => String::new(),
        TickFormat::Integer => format!("{}", value.trunc() as i64),
        TickFormat::Identity => format!("{:.*}", decimals_for(step), value),
        TickFormat::Grouped => {
            let (locale, dec_sep) = map_locale(locale_tag);
            let places = decimals_for(step);
            let whole = value.trunc() as i64;
            let mut s = whole.abs().to_formatted_string(locale);
            if value < 0.0 {
                s.insert(0, '-');
            }
            if places > 0 {
                let frac = format!("{:.*}", places, value.abs().fract());
                if let Some(digits) = frac.split('.').nth(1) {
                    s.push(dec_sep);
                    s.push_str(digits);
                }
            }
            s
        }
    }
}
