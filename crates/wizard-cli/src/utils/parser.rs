use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Expected three comma-separated numbers (e.g., '1,0,0'), got '{0}'.")]
    InvalidTripletFormat(String),

    #[error("Component '{component}' of '{value}' is not a valid number.")]
    InvalidNumber { component: String, value: String },
}

/// Parses `"x,y,z"` into three floats. Whitespace around components is ignored.
pub fn parse_triplet(value: &str) -> Result<[f64; 3], ParseError> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let [x, y, z] = parts[..] else {
        return Err(ParseError::InvalidTripletFormat(value.to_string()));
    };

    let number = |component: &str| {
        component
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidNumber {
                component: component.to_string(),
                value: value.to_string(),
            })
    };
    Ok([number(x)?, number(y)?, number(z)?])
}
