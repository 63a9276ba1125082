use crate::models::Gradeable;

/// 按精度取整，恰好一半时远离零
///
/// 精度为 0 时原样返回。
pub fn round_to_precision(value: f64, precision: f64) -> f64 {
    if precision == 0.0 {
        return value;
    }

    let mut quotient = (value / precision).trunc();
    let remainder = value % precision;
    if remainder.abs() >= precision / 2.0 {
        quotient += remainder.signum();
    }
    quotient * precision
}

impl Gradeable {
    /// 将分数按作业精度取整
    pub fn round_point_value(&self, value: f64) -> f64 {
        round_to_precision(value, self.precision)
    }
}
