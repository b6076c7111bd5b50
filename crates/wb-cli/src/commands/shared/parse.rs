use std::fmt::Display;
use std::str::FromStr;

/// Parse a command-line value, naming the flag in the error.
pub fn parse_value<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse()
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

#[cfg(test)]
mod tests {
    use wb_core::enums::DeliveryOrderState;

    use super::parse_value;

    #[test]
    fn parses_lowercase_state() {
        let state: DeliveryOrderState = parse_value("delivered", "state").expect("state should parse");
        assert_eq!(state, DeliveryOrderState::Delivered);
    }

    #[test]
    fn parses_hyphenated_alias() {
        let state: DeliveryOrderState =
            parse_value("in-progress", "state").expect("state should parse");
        assert_eq!(state, DeliveryOrderState::InProgress);
    }

    #[test]
    fn errors_on_invalid_state() {
        let err = parse_value::<DeliveryOrderState>("lost", "state").expect_err("should fail");
        assert!(err.to_string().contains("invalid state 'lost'"));
    }
}
