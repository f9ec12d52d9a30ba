/// 명시적 폼 검증 도우미
/// 각 함수는 오류를 `FieldErrors`에 쌓고, 호출 측에서 `into_result`로 결과를 만든다.
use crate::amount::Amount;
use crate::error::FieldErrors;

pub const REQUIRED: &str = "This field is required.";

/// 필수 텍스트 필드 길이 검증. 앞뒤 공백을 제거한 값을 돌려준다
pub fn required_text(errors: &mut FieldErrors, field: &str, value: &str, max: usize) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
    } else {
        max_length(errors, field, value, max);
    }
    value.to_string()
}

/// 선택 텍스트 필드 길이 검증
pub fn optional_text(errors: &mut FieldErrors, field: &str, value: &str, max: usize) -> String {
    let value = value.trim();
    max_length(errors, field, value, max);
    value.to_string()
}

fn max_length(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    let len = value.chars().count();
    if len > max {
        errors.add(
            field,
            format!(
                "Ensure this value has at most {} characters (it has {}).",
                max, len
            ),
        );
    }
}

/// 범위 검증
pub fn in_range<const DP: u32>(
    errors: &mut FieldErrors,
    field: &str,
    value: Amount<DP>,
    min: Amount<DP>,
    max: Amount<DP>,
) {
    if value < min {
        errors.add(
            field,
            format!("Ensure this value is greater than or equal to {}.", min),
        );
    } else if value > max {
        errors.add(
            field,
            format!("Ensure this value is less than or equal to {}.", max),
        );
    }
}
