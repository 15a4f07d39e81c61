//! Interactive estimate prompt.
//!
//! This is intentionally kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the prompt reads one `<area> <bedrooms> <bathrooms> <city>` query per line
//!
//! Input and output are generic so the loop can be driven from tests.

use std::io::{BufRead, Write};

use crate::app::Session;
use crate::domain::{Bathrooms, PriceQuery};
use crate::error::{AppError, EstimatorError};
use crate::report::format_estimate;

const PROMPT: &str = "Enter <area> <bedrooms> <bathrooms> <city> (q to quit): ";

/// Parse one prompt line. The city is everything after the third field.
pub fn parse_query_line(line: &str) -> Result<PriceQuery, EstimatorError> {
    let mut fields = line.split_whitespace();
    let (Some(area), Some(bedrooms), Some(bathrooms)) = (fields.next(), fields.next(), fields.next()) else {
        return Err(EstimatorError::InvalidQuery(
            "expected <area> <bedrooms> <bathrooms> <city>".into(),
        ));
    };
    let city = fields.collect::<Vec<_>>().join(" ");

    let area: u32 = area
        .parse()
        .map_err(|_| EstimatorError::InvalidQuery(format!("area must be a whole number (got '{area}')")))?;
    let bedrooms: u8 = bedrooms
        .parse()
        .map_err(|_| EstimatorError::InvalidQuery(format!("bedrooms must be a whole number (got '{bedrooms}')")))?;
    let bathrooms: f64 = bathrooms
        .parse()
        .map_err(|_| EstimatorError::InvalidQuery(format!("bathrooms must be a number (got '{bathrooms}')")))?;
    let bathrooms = Bathrooms::try_from(bathrooms).map_err(EstimatorError::InvalidQuery)?;

    PriceQuery::new(area, bedrooms, bathrooms, city)
}

fn is_quit(line: &str) -> bool {
    matches!(line.to_ascii_lowercase().as_str(), "q" | "quit" | "exit")
}

/// Run the prompt until `q` or end of input. Returns the number of answered queries.
///
/// Bad lines are reported and skipped; failures to build the market end the loop.
pub fn run_prompt<R: BufRead, W: Write>(session: &mut Session, mut input: R, out: &mut W) -> Result<usize, AppError> {
    let write_err = |e: std::io::Error| AppError::new(2, format!("Failed to write prompt: {e}"));
    let mut answered = 0;

    loop {
        write!(out, "{PROMPT}").map_err(write_err)?;
        out.flush().map_err(write_err)?;

        let mut line = String::new();
        let bytes = input
            .read_line(&mut line)
            .map_err(|e| AppError::new(2, format!("Failed to read input: {e}")))?;
        if bytes == 0 {
            writeln!(out).map_err(write_err)?;
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_quit(line) {
            break;
        }

        let query = match parse_query_line(line) {
            Ok(q) => q,
            Err(err) => {
                writeln!(out, "{err}").map_err(write_err)?;
                continue;
            }
        };

        let outcome = session.estimate(query)?;
        writeln!(out, "{}", format_estimate(&outcome)).map_err(write_err)?;
        answered += 1;
    }

    Ok(answered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SessionSettings;
    use crate::domain::ForestConfig;

    fn session() -> Session {
        Session::new(SessionSettings {
            sample_size: 80,
            seed: Some(5),
            forest: ForestConfig {
                n_trees: 10,
                ..ForestConfig::default()
            },
            ..SessionSettings::default()
        })
    }

    #[test]
    fn parses_multi_word_city() {
        let q = parse_query_line("  1500 3 2.5   Navi Mumbai ").unwrap();
        assert_eq!(q.area(), 1500);
        assert_eq!(q.bedrooms(), 3);
        assert_eq!(q.bathrooms().value(), 2.5);
        assert_eq!(q.city(), "Navi Mumbai");
    }

    #[test]
    fn rejects_malformed_lines() {
        for line in ["", "1500 3", "big 3 2 Pune", "1500 3 2.2 Pune", "1500 9 2 Pune", "1500 3 2"] {
            assert!(
                matches!(parse_query_line(line), Err(EstimatorError::InvalidQuery(_))),
                "accepted {line:?}"
            );
        }
    }

    #[test]
    fn loop_answers_until_quit() {
        let mut s = session();
        let input = "1500 3 2 Mumbai\n\nnonsense\n900 2 1 Patna\nq\n1000 2 2 Pune\n";
        let mut out = Vec::new();

        let answered = run_prompt(&mut s, input.as_bytes(), &mut out).unwrap();

        assert_eq!(answered, 2);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Estimated price").count(), 2);
        assert!(text.contains("Invalid query"));
        assert_eq!(s.last().unwrap().query.city(), "Patna");
    }

    #[test]
    fn loop_stops_at_end_of_input() {
        let mut s = session();
        let mut out = Vec::new();
        assert_eq!(run_prompt(&mut s, "".as_bytes(), &mut out).unwrap(), 0);
        assert!(!s.is_prepared());
    }
}
