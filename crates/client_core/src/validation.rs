//! Turns raw form input into request payloads. Everything here is pure.

use std::collections::BTreeSet;

use shared::{
    domain::{DrawId, DrawNumber, Strategy, MAX_TICKET_NUMBERS, MIN_TICKET_NUMBERS},
    protocol::{SuggestionRequest, VerificationRequest},
};

use crate::error::{Field, ValidationError};

/// Validates a ticket submission.
///
/// `raw_numbers` is a comma-separated list. Each token contributes its
/// leading integer and tokens without one are dropped without complaint.
/// Duplicates collapse and the surviving set must hold between 10 and 15
/// numbers. The returned numbers are ascending.
pub fn validate_ticket(
    raw_numbers: &str,
    team: &str,
    draw_id: &str,
) -> Result<VerificationRequest, ValidationError> {
    if raw_numbers.trim().is_empty() {
        return Err(ValidationError::MissingField(Field::Numbers));
    }
    let team = team.trim();
    if team.is_empty() {
        return Err(ValidationError::MissingField(Field::Team));
    }
    let draw_id = parse_draw_id(draw_id).ok_or(ValidationError::MissingField(Field::DrawId))?;

    let mut numbers = BTreeSet::new();
    for value in parse_integers(raw_numbers) {
        let number =
            DrawNumber::new(value).map_err(|_| ValidationError::OutOfRange { number: value })?;
        numbers.insert(number);
    }
    check_ticket_size(numbers.len())?;

    Ok(VerificationRequest {
        numbers,
        team: team.to_string(),
        draw_id,
    })
}

/// Builds a suggestion request, applying the same ticket-size rule to the
/// numbers generated per game.
pub fn validate_suggestion(
    strategy: Strategy,
    numbers_per_game: u8,
    games: u8,
) -> Result<SuggestionRequest, ValidationError> {
    check_ticket_size(usize::from(numbers_per_game))?;
    if games == 0 {
        return Err(ValidationError::InvalidGames);
    }
    Ok(SuggestionRequest {
        strategy,
        numbers_per_game,
        games,
    })
}

fn parse_integers(raw: &str) -> impl Iterator<Item = i64> + '_ {
    raw.split(',').filter_map(leading_integer)
}

/// Reads an optional sign and the run of digits at the start of a trimmed
/// token, ignoring whatever follows (`"12abc"` is 12, `"3.5"` is 3). Tokens
/// without leading digits yield `None`. Runs too long for `i64` saturate and
/// are then rejected by the range check.
fn leading_integer(token: &str) -> Option<i64> {
    let token = token.trim();
    let (negative, rest) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if digits.is_empty() {
        return None;
    }
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn parse_draw_id(raw: &str) -> Option<DrawId> {
    leading_integer(raw)
        .and_then(|id| u32::try_from(id).ok())
        .filter(|id| *id > 0)
        .map(DrawId)
}

fn check_ticket_size(count: usize) -> Result<(), ValidationError> {
    if (MIN_TICKET_NUMBERS..=MAX_TICKET_NUMBERS).contains(&count) {
        Ok(())
    } else {
        Err(ValidationError::InvalidCount { count })
    }
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
