//! Unit catalog operations

use serde::{Deserialize, Serialize};

use super::{require_non_negative, ApiError, ApiResult};
use crate::units::{catalog, convert, resolve, UnitDefinition, UnitError, UnitFamily};

/// One catalog entry as exposed over the API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitInfo {
    pub label: &'static str,
    pub family: UnitFamily,
    pub base_factor: Option<f64>,
}

impl From<&UnitDefinition> for UnitInfo {
    fn from(unit: &UnitDefinition) -> Self {
        Self {
            label: unit.label,
            family: unit.family(),
            base_factor: unit.base_factor(),
        }
    }
}

/// Request body for a conversion
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertRequest {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

/// Result of a conversion, echoing canonical labels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertResponse {
    pub amount: f64,
    pub from: &'static str,
    pub to: &'static str,
    pub result: f64,
}

pub fn list_units() -> Vec<UnitInfo> {
    catalog().iter().map(|unit| UnitInfo::from(*unit)).collect()
}

/// Resolve a label; unknown labels are a 404 here
pub fn get_unit(label: &str) -> ApiResult<UnitInfo> {
    match resolve(label) {
        Ok(unit) => Ok(UnitInfo::from(unit)),
        Err(err @ UnitError::UnknownUnit(_)) => Err(ApiError::not_found(err.to_string())),
        Err(err) => Err(err.into()),
    }
}

pub fn convert_quantity(request: &ConvertRequest) -> ApiResult<ConvertResponse> {
    require_non_negative("amount", request.amount)?;
    let from = resolve(&request.from)?;
    let to = resolve(&request.to)?;
    let result = convert(request.amount, from, to)?;

    Ok(ConvertResponse {
        amount: request.amount,
        from: from.label,
        to: to.label,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: f64, from: &str, to: &str) -> ConvertRequest {
        ConvertRequest {
            amount,
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    #[test]
    fn test_list_units() {
        let units = list_units();
        assert_eq!(units.len(), 12);
        let leaf = units.iter().find(|u| u.label == "leaf").unwrap();
        assert_eq!(leaf.family, UnitFamily::Count);
        assert_eq!(leaf.base_factor, None);
    }

    #[test]
    fn test_get_unit() {
        assert_eq!(get_unit("TBSP").unwrap().base_factor, Some(14.79));
        let err = get_unit("smidgen").unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(err.to_string(), "Unknown unit: 'smidgen'");
    }

    #[test]
    fn test_convert_quantity() {
        let response = convert_quantity(&request(2.0, "Cup", "ml")).unwrap();
        assert_eq!(response.result, 473.18);
        assert_eq!(response.from, "cup");

        assert!(matches!(
            convert_quantity(&request(1.0, "cup", "g")),
            Err(ApiError::Unit(UnitError::IncompatibleUnits { .. }))
        ));
        assert!(matches!(
            convert_quantity(&request(1.0, "cup", "quart")),
            Err(ApiError::Unit(UnitError::UnknownUnit(_)))
        ));
        assert!(matches!(
            convert_quantity(&request(-1.0, "cup", "ml")),
            Err(ApiError::BadRequest(_))
        ));
    }
}
