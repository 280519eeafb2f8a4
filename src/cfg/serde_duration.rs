use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

pub use serde_with::{serde_as, DeserializeAs, SerializeAs};

/// 超时时长的人性化格式
///
/// 支持格式: "500ms", "30s", "2m", "1h", "1m30s"
pub struct HumanDur;

impl SerializeAs<Duration> for HumanDur {
    fn serialize_as<S>(source: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_duration(*source))
    }
}

impl<'de> DeserializeAs<'de, Duration> for HumanDur {
    fn deserialize_as<D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }
}

/// 解析时间字符串: "1m30s" -> Duration
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim().to_lowercase();
    if s.is_empty() {
        return Err(anyhow!("空字符串"));
    }

    let mut total = Duration::ZERO;
    let mut rest = s.as_str();
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_end == 0 {
            return Err(anyhow!("期望数字: {}", rest));
        }
        let value: f64 = rest[..number_end]
            .parse()
            .map_err(|_| anyhow!("无效数字: {}", &rest[..number_end]))?;
        rest = &rest[number_end..];

        let unit_end = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        let seconds_per_unit = match &rest[..unit_end] {
            "ms" => 0.001,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            "" => return Err(anyhow!("缺少时间单位")),
            unit => return Err(anyhow!("不支持的时间单位: {}", unit)),
        };
        rest = &rest[unit_end..];

        let part = Duration::try_from_secs_f64(value * seconds_per_unit)
            .map_err(|_| anyhow!("时长超出范围"))?;
        total = total
            .checked_add(part)
            .ok_or_else(|| anyhow!("时长超出范围"))?;
    }

    Ok(total)
}

/// Duration 格式化为字符串: Duration -> "1m30s"
///
/// 精度为毫秒，不足 1ms 的部分被截断。
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis == 0 {
        return "0s".to_string();
    }
    if millis % 1000 != 0 {
        return format!("{}ms", millis);
    }

    let mut secs = millis / 1000;
    let mut out = String::new();
    for (unit, size) in [("h", 3600), ("m", 60)] {
        if secs >= size {
            out.push_str(&format!("{}{}", secs / size, unit));
            secs %= size;
        }
    }
    if secs > 0 {
        out.push_str(&format!("{}s", secs));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
    }

    #[test]
    fn test_parse_duration_compound() {
        assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
        assert_eq!(
            parse_duration(" 1H2M3S ").unwrap(),
            Duration::from_secs(3600 + 120 + 3)
        );
    }

    #[test]
    fn test_parse_duration_errors() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("s").is_err());
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("10x").is_err());
        assert!(parse_duration("1d").is_err());
    }

    #[test]
    fn test_parse_duration_out_of_range() {
        assert!(parse_duration("99999999999999999999999h").is_err());
        assert!(parse_duration("5000000000000000h5000000000000000h").is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m30s");
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h");
    }

    #[test]
    fn test_format_duration_truncates_below_millisecond() {
        assert_eq!(format_duration(Duration::from_micros(500)), "0s");
        assert_eq!(format_duration(Duration::from_micros(1_000_500)), "1s");
        assert_eq!(format_duration(Duration::from_micros(1_500_900)), "1500ms");
    }

    #[serde_as]
    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Deadline {
        #[serde_as(as = "Option<HumanDur>")]
        #[serde(default)]
        timeout: Option<Duration>,
    }

    #[test]
    fn test_option_human_dur_yaml() {
        let parsed: Deadline = serde_yaml::from_str("timeout: 45s").unwrap();
        assert_eq!(parsed.timeout, Some(Duration::from_secs(45)));

        let parsed: Deadline = serde_yaml::from_str("{}").unwrap();
        assert_eq!(parsed.timeout, None);

        let yaml = serde_yaml::to_string(&Deadline {
            timeout: Some(Duration::from_secs(90)),
        })
        .unwrap();
        assert!(yaml.contains("1m30s"));
    }
}
