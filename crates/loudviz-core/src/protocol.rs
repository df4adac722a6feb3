use serde::{Deserialize, Deserializer, Serialize};

/// One waveform frame as served by the sensor's `/data` endpoint.
///
/// Wire format: `{"data": [n0, n1, ...]}`. Samples are signed amplitudes in
/// the sensor's native scale (16-bit PCM range in practice); both integer
/// and float JSON numbers are accepted. Nulls decode as silence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleFrame {
    #[serde(rename = "data", deserialize_with = "lenient_samples")]
    pub samples: Vec<f32>,
}

impl SampleFrame {
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Largest absolute amplitude, 0 for an empty frame.
    pub fn peak_amplitude(&self) -> f32 {
        self.samples
            .iter()
            .map(|s| s.abs())
            .filter(|s| s.is_finite())
            .fold(0.0_f32, f32::max)
    }
}

fn lenient_samples<'de, D>(deserializer: D) -> Result<Vec<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Option<f64>> = Vec::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|v| match v {
            Some(x) if x.is_finite() => x as f32,
            _ => 0.0,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_mixed_numbers() {
        let frame = SampleFrame::decode(br#"{"data":[1,-2,3.5]}"#).unwrap();
        assert_eq!(frame.samples, vec![1.0, -2.0, 3.5]);
        assert_eq!(frame.peak_amplitude(), 3.5);
    }

    #[test]
    fn test_decode_ignores_extra_fields_and_nulls() {
        let frame = SampleFrame::decode(br#"{"rate":8000,"data":[null,-7]}"#).unwrap();
        assert_eq!(frame.samples, vec![0.0, -7.0]);
        assert_eq!(frame.peak_amplitude(), 7.0);
    }

    #[test]
    fn test_decode_rejects_missing_field() {
        assert!(SampleFrame::decode(br#"{"values":[]}"#).is_err());
        assert!(SampleFrame::decode(br#"{"data":"nope"}"#).is_err());
    }

    #[test]
    fn test_encode_uses_wire_field_name() {
        let json = serde_json::to_string(&SampleFrame::new(vec![0.5])).unwrap();
        assert_eq!(json, r#"{"data":[0.5]}"#);
    }

    #[test]
    fn test_empty_frame_peak_is_zero() {
        assert_eq!(SampleFrame::default().peak_amplitude(), 0.0);
    }
}
