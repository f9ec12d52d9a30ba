/// 고정소수점 금액/수량
/// DB에는 최소 단위 정수(i64)로 저장하고, JSON에는 "12.7" 같은 10진 문자열로 주고받는다.
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{Sqlite, SqliteTypeInfo};
use sqlx::{Decode, Encode, Type};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;
use thiserror::Error;

// region:    --- Amount

/// 소수점 `DP`자리 고정소수점 값
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount<const DP: u32>(i64);

/// 경매 금액 (소수점 2자리)
pub type Money = Amount<2>;

/// 재고 수량 (소수점 1자리)
pub type Quantity = Amount<1>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("Enter a number.")]
    Invalid,
    #[error("Ensure that there are no more than {0} decimal places.")]
    TooManyDecimalPlaces(u32),
    #[error("Ensure that there are no more than 15 digits in total.")]
    Overflow,
}

impl<const DP: u32> Amount<DP> {
    pub const ZERO: Self = Self(0);
    const SCALE: i64 = 10_i64.pow(DP);

    /// 최소 단위 정수로부터 생성
    pub const fn from_units(units: i64) -> Self {
        Self(units)
    }

    /// 최소 단위 정수
    pub const fn units(self) -> i64 {
        self.0
    }

    /// 정수 값으로부터 생성
    pub const fn whole(value: i64) -> Self {
        Self(value * Self::SCALE)
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// 폼 입력값 해석. null 또는 빈 문자열은 `None`
    pub fn from_json(value: &serde_json::Value) -> Result<Option<Self>, AmountError> {
        match value {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::String(s) if s.trim().is_empty() => Ok(None),
            serde_json::Value::String(s) => s.parse().map(Some),
            serde_json::Value::Number(n) => n.to_string().parse().map(Some),
            _ => Err(AmountError::Invalid),
        }
    }
}

impl<const DP: u32> From<i64> for Amount<DP> {
    fn from(units: i64) -> Self {
        Self(units)
    }
}

impl<const DP: u32> Add for Amount<DP> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl<const DP: u32> Sub for Amount<DP> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl<const DP: u32> Sum for Amount<DP> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<const DP: u32> FromStr for Amount<DP> {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (int_part, frac_part) = match digits.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (digits, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(AmountError::Invalid);
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(AmountError::Invalid);
        }

        // 허용 자릿수를 넘는 소수부는 0일 때만 허용
        let width = DP as usize;
        let (kept, extra) = frac_part.split_at(frac_part.len().min(width));
        if extra.bytes().any(|b| b != b'0') {
            return Err(AmountError::TooManyDecimalPlaces(DP));
        }

        let whole: i64 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| AmountError::Overflow)?
        };
        let frac: i64 = if kept.is_empty() {
            0
        } else {
            format!("{:0<width$}", kept, width = width)
                .parse()
                .map_err(|_| AmountError::Invalid)?
        };

        let units = whole
            .checked_mul(Self::SCALE)
            .and_then(|units| units.checked_add(frac))
            .ok_or(AmountError::Overflow)?;

        Ok(Self(if negative { -units } else { units }))
    }
}

impl<const DP: u32> fmt::Display for Amount<DP> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = Self::SCALE as u64;
        if DP == 0 {
            return write!(f, "{}{}", sign, abs);
        }
        write!(
            f,
            "{}{}.{:0width$}",
            sign,
            abs / scale,
            abs % scale,
            width = DP as usize
        )
    }
}

impl<const DP: u32> Serialize for Amount<DP> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, const DP: u32> Deserialize<'de> for Amount<DP> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor::<DP>)
    }
}

struct AmountVisitor<const DP: u32>;

impl<'de, const DP: u32> Visitor<'de> for AmountVisitor<DP> {
    type Value = Amount<DP>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a decimal number with at most {} decimal places", DP)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        v.checked_mul(Amount::<DP>::SCALE)
            .map(Amount)
            .ok_or_else(|| E::custom(AmountError::Overflow))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        let v = i64::try_from(v).map_err(|_| E::custom(AmountError::Overflow))?;
        self.visit_i64(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if !v.is_finite() {
            return Err(E::custom(AmountError::Invalid));
        }
        self.visit_str(&v.to_string())
    }
}

// endregion: --- Amount

// region:    --- SQLx

impl<const DP: u32> Type<Sqlite> for Amount<DP> {
    fn type_info() -> SqliteTypeInfo {
        <i64 as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <i64 as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q, const DP: u32> Encode<'q, Sqlite> for Amount<DP> {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        <i64 as Encode<'q, Sqlite>>::encode_by_ref(&self.0, buf)
    }
}

impl<'r, const DP: u32> Decode<'r, Sqlite> for Amount<DP> {
    fn decode(value: <Sqlite as sqlx::Database>::ValueRef<'r>) -> Result<Self, BoxDynError> {
        Ok(Self(<i64 as Decode<'r, Sqlite>>::decode(value)?))
    }
}

// endregion: --- SQLx
