//! Default value functions for serde deserialization.

pub fn min_distance_mm() -> f32 {
    10.0
}

pub fn min_heading_deg() -> f32 {
    5.0
}

pub fn heading_to_distance_mm_per_deg() -> f32 {
    2.5
}

pub fn residual_fraction() -> f32 {
    0.0
}

pub fn arc_min_distance_mm() -> f32 {
    20.0
}

pub fn arc_min_heading_deg() -> f32 {
    2.0
}

pub fn arc_min_streak() -> usize {
    2
}

pub fn arc_ratio_scale_mm_per_deg() -> f32 {
    10.0
}

pub fn arc_ratio_min() -> f32 {
    0.4
}

pub fn arc_ratio_max() -> f32 {
    2.0
}

pub fn motor_start_threshold_deg() -> f32 {
    1.0
}

pub fn motor_min_angle_deg() -> f32 {
    5.0
}

pub fn motor_stop_speed_deg_s() -> f32 {
    10.0
}

pub fn drivebase_motors() -> Vec<String> {
    vec!["left".to_string(), "right".to_string()]
}

pub fn decimals() -> usize {
    1
}

pub fn enabled() -> bool {
    true
}
