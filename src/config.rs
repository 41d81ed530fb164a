//! Loading behaviour profiles from RON.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::ai::profile::BehaviorProfile;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read profile {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed profile: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid profile: {0}")]
    Invalid(String),
}

impl BehaviorProfile {
    /// Parse and validate a profile from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let profile: BehaviorProfile = ron::from_str(text)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let profile = Self::from_ron_str(&text)?;
        log::info!(
            "loaded profile {} ({} attacks)",
            path.display(),
            profile.attacks.len()
        );
        Ok(profile)
    }

    /// Reject values the controller cannot work with. Zero-weight attacks are
    /// legal but never drawn, so they only warn.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pairs = [
            ("close_attack_range", self.close_attack_range_min, self.close_attack_range_max),
            ("attack_wait", self.attack_wait_min, self.attack_wait_max),
            ("chase_angle_time", self.chase_angle_time_min, self.chase_angle_time_max),
        ];
        for (name, min, max) in pairs {
            if !(min.is_finite() && max.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "{name}: bounds must be finite, got {min}..{max}"
                )));
            }
            if min > max {
                return Err(ConfigError::Invalid(format!(
                    "{name}: min {min} exceeds max {max}"
                )));
            }
        }
        let scalars = [
            ("detect_range", self.detect_range),
            ("far_attack_range", self.far_attack_range),
            ("focus_range", self.focus_range),
            ("focus_time", self.focus_time),
            ("chase_angle_min_range", self.chase_angle_min_range),
            ("turn_angle", self.turn_angle),
        ];
        for (name, value) in scalars {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        for attack in &self.attacks {
            if !(attack.weight.is_finite() && attack.weight >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "attack {} needs a finite non-negative weight, got {}",
                    attack.name, attack.weight
                )));
            }
            if attack.ranges.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "attack {} has no range box",
                    attack.name
                )));
            }
            if let Some(r) = attack.ranges.iter().find(|r| !(r.min.is_finite() && r.max.is_finite())) {
                return Err(ConfigError::Invalid(format!(
                    "attack {}: box {}..{} is not finite",
                    attack.name, r.min, r.max
                )));
            }
            if let Some(r) = attack.ranges.iter().find(|r| r.min.cmpgt(r.max).any()) {
                return Err(ConfigError::Invalid(format!(
                    "attack {}: box min {} exceeds max {}",
                    attack.name, r.min, r.max
                )));
            }
            if attack.weight == 0.0 {
                log::warn!("attack {} has zero weight and will never be chosen", attack.name);
            }
        }
        if self.attacks.is_empty() {
            log::warn!("profile has no attacks; titans will only chase");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const SAMPLE: &str = r#"(
        detect_range: 400.0,
        close_attack_range_min: 15.0,
        close_attack_range_max: 25.0,
        far_attack_range: 200.0,
        focus_range: 120.0,
        focus_time: 4.0,
        attack_wait_min: 0.2,
        attack_wait_max: 0.8,
        chase_angle_time_min: 0.5,
        chase_angle_time_max: 1.5,
        chase_angle_min_range: 60.0,
        is_run: false,
        turn_angle: 35.0,
        attacks: [
            (name: "Swipe", weight: 2.0, ranges: [(min: (-10.0, 0.0, 0.0), max: (10.0, 20.0, 25.0))]),
            (name: "Grab", weight: 1.0, human_only: true, ranges: [(min: (-5.0, 0.0, 0.0), max: (5.0, 15.0, 15.0))]),
            (name: "Hurl", weight: 1.0, far_only: true, ranges: [(min: (-60.0, -10.0, 40.0), max: (60.0, 60.0, 200.0))]),
        ],
    )"#;

    #[test]
    fn parses_sample_profile() {
        let p = BehaviorProfile::from_ron_str(SAMPLE).unwrap();
        assert_eq!(p.detect_range, 400.0);
        assert!(!p.is_run);
        assert!(!p.is_turn);
        let names: Vec<_> = p.attacks.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Swipe", "Grab", "Hurl"]);
        assert!(p.attacks[1].human_only);
        assert!(!p.attacks[1].far_only);
        assert!(p.attacks[2].far_only);
        assert_eq!(p.attacks[0].ranges[0].max, Vec3::new(10.0, 20.0, 25.0));
    }

    #[test]
    fn default_profile_survives_ron() {
        let p = BehaviorProfile::default_titan();
        let text = ron::to_string(&p).unwrap();
        assert_eq!(BehaviorProfile::from_ron_str(&text).unwrap(), p);
    }

    #[test]
    fn syntax_errors_are_parse_errors() {
        let err = BehaviorProfile::from_ron_str("(detect_range: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn negative_weight_is_rejected() {
        let text = SAMPLE.replace("weight: 2.0", "weight: -1.0");
        let err = BehaviorProfile::from_ron_str(&text).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref m) if m.contains("Swipe")));
    }

    #[test]
    fn inverted_pairs_are_rejected() {
        let text = SAMPLE.replace("attack_wait_max: 0.8", "attack_wait_max: 0.1");
        assert!(matches!(
            BehaviorProfile::from_ron_str(&text),
            Err(ConfigError::Invalid(_))
        ));

        let mut p = BehaviorProfile::default_titan();
        p.attacks[0].ranges[0].min.z = 100.0;
        assert!(matches!(p.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn nan_values_are_rejected() {
        let mut p = BehaviorProfile::default_titan();
        p.attacks[0].weight = f32::NAN;
        assert!(matches!(p.validate(), Err(ConfigError::Invalid(m)) if m.contains("Punch")));

        let mut p = BehaviorProfile::default_titan();
        p.close_attack_range_min = f32::NAN;
        assert!(matches!(p.validate(), Err(ConfigError::Invalid(m)) if m.contains("close_attack_range")));

        let mut p = BehaviorProfile::default_titan();
        p.attack_wait_max = f32::INFINITY;
        assert!(p.validate().is_err());

        let mut p = BehaviorProfile::default_titan();
        p.attacks[1].ranges[0].max.y = f32::NAN;
        assert!(matches!(p.validate(), Err(ConfigError::Invalid(m)) if m.contains("Slap")));

        let mut p = BehaviorProfile::default_titan();
        p.turn_angle = f32::NAN;
        assert!(p.validate().is_err());
    }

    #[test]
    fn attack_without_ranges_is_rejected() {
        let mut p = BehaviorProfile::default_titan();
        p.attacks[2].ranges.clear();
        assert!(matches!(p.validate(), Err(ConfigError::Invalid(m)) if m.contains("Kick")));
    }

    #[test]
    fn zero_weight_only_warns() {
        let mut p = BehaviorProfile::default_titan();
        p.attacks[0].weight = 0.0;
        assert!(p.validate().is_ok());
    }

    #[test]
    fn bundled_crawler_profile_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/profiles/crawler.ron");
        let p = BehaviorProfile::load(path).unwrap();
        assert_eq!(p.attacks.len(), 2);
        assert_eq!(p.attack_wait_max, 0.0);
        assert!(p.attack("Lunge").unwrap().human_only);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = BehaviorProfile::load("/nonexistent/titan.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
