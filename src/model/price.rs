//! Price list records (GetPriceList response).

use serde::{Deserialize, Serialize};

use crate::codec::Timestamp;

/// Indikator harga dari field `color`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceLevel {
    /// Cheap and mostly renewable
    Green,
    /// Around normal prices
    Yellow,
    /// Expensive
    Red,
}

impl PriceLevel {
    /// Map the API's color name. Unknown names give `None`.
    pub fn from_color(name: &str) -> Option<Self> {
        match name {
            "green" => Some(Self::Green),
            "yellow" => Some(Self::Yellow),
            "red" => Some(Self::Red),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

/// One half-hour price point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub period: Timestamp,
    #[serde(rename = "priceKWH")]
    pub price_kwh: f64,
    pub renewable_in_grid: f64,
    pub color: String,
}

impl Price {
    pub fn level(&self) -> Option<PriceLevel> {
        PriceLevel::from_color(&self.color)
    }
}

/// Current price plus forecast and history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceData {
    #[serde(rename = "currentPriceKWH")]
    pub current_price_kwh: f64,
    pub current_renewable_in_grid: f64,
    pub current_price_color: String,
    pub current_price_period: Timestamp,
    pub forecast_prices: Vec<Price>,
    pub previous_prices: Vec<Price>,
}

impl PriceData {
    pub fn current_level(&self) -> Option<PriceLevel> {
        PriceLevel::from_color(&self.current_price_color)
    }

    /// Cheapest upcoming forecast point, if any.
    pub fn cheapest_forecast(&self) -> Option<&Price> {
        self.forecast_prices
            .iter()
            .min_by(|a, b| a.price_kwh.total_cmp(&b.price_kwh))
    }
}

/// Persisted under the price slot.
///
/// `message` is never written to or read from the binary stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPriceData {
    pub data: PriceData,
    pub service_response_type: i64,
    #[serde(skip)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(offset: f64, kwh: f64, color: &str) -> Price {
        Price {
            period: Timestamp::from_reference_offset(offset),
            price_kwh: kwh,
            renewable_in_grid: 40.0,
            color: color.to_string(),
        }
    }

    #[test]
    fn test_price_level() {
        assert_eq!(PriceLevel::from_color("green"), Some(PriceLevel::Green));
        assert_eq!(PriceLevel::from_color("red"), Some(PriceLevel::Red));
        assert_eq!(PriceLevel::from_color("Green"), None);
        assert_eq!(PriceLevel::Yellow.as_str(), "yellow");
        assert_eq!(price(0.0, 1.0, "yellow").level(), Some(PriceLevel::Yellow));
    }

    #[test]
    fn test_cheapest_forecast() {
        let data = PriceData {
            current_price_kwh: 20.0,
            current_renewable_in_grid: 30.0,
            current_price_color: "green".to_string(),
            current_price_period: Timestamp::REFERENCE_EPOCH,
            forecast_prices: vec![price(1800.0, 25.0, "yellow"), price(3600.0, 12.5, "green")],
            previous_prices: vec![],
        };
        assert_eq!(data.cheapest_forecast().map(|p| p.price_kwh), Some(12.5));
        assert_eq!(data.current_level(), Some(PriceLevel::Green));
    }

    #[test]
    fn test_price_from_api_json() {
        let json = r#"{"period":"2019-08-31T22:00:00Z","priceKWH":19.5,"renewableInGrid":40.0,"color":"green"}"#;
        let p: Price = serde_json::from_str(json).unwrap();
        assert_eq!(p.period.to_api_string().as_deref(), Some("2019-08-31T22:00:00Z"));
        assert_eq!(p.price_kwh, 19.5);
        assert_eq!(p.level(), Some(PriceLevel::Green));
    }

    #[test]
    fn test_current_price_from_api_json() {
        let json = r#"{
            "data": {
                "currentPriceKWH": 23.1,
                "currentRenewableInGrid": 35.5,
                "currentPriceColor": "yellow",
                "currentPricePeriod": "2019-09-09T09:30:00Z",
                "forecastPrices": [
                    {"period":"2019-09-09T10:00:00Z","priceKWH":18.0,"renewableInGrid":41.0,"color":"green"}
                ],
                "previousPrices": []
            },
            "serviceResponseType": 1,
            "message": "ok"
        }"#;
        let record: CurrentPriceData = serde_json::from_str(json).unwrap();
        assert_eq!(record.data.current_price_period.unix_seconds(), 1_567_985_400.0);
        assert_eq!(record.data.forecast_prices.len(), 1);
        assert_eq!(record.service_response_type, 1);
        // message is not part of the record layout
        assert_eq!(record.message, None);

        // binary layout is unaffected by the JSON date handling
        let bytes = crate::codec::encode(&record).unwrap();
        assert_eq!(crate::codec::decode::<CurrentPriceData>(&bytes).unwrap(), record);
    }
}
