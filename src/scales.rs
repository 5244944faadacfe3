//! Axis scales mapping data values onto an output range.

use std::fmt;
use std::sync::Arc;

/// Maps data values onto a continuous output range.
pub trait ScaleMapper: Send + Sync {
    /// Position of `value` in the output range, `None` when the value cannot be mapped.
    fn map(&self, value: f64) -> Option<f64>;

    fn range(&self) -> (f64, f64);

    /// Position of `value` as a fraction of the output range:
    /// 0 at `range().0`, 1 at `range().1`, independent of the range itself.
    fn normalize(&self, value: f64) -> Option<f64> {
        fraction_of_range(self.map(value)?, self.range())
    }
}

fn fraction_of_range(position: f64, (r0, r1): (f64, f64)) -> Option<f64> {
    let span = r1 - r0;
    if span == 0.0 || !span.is_finite() {
        return None;
    }
    let t = (position - r0) / span;
    t.is_finite().then_some(t)
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogScale {
    domain: (f64, f64),
    range: (f64, f64),
}

/// Categorical scale: value `i` is the index of a band, mapped to the band's center.
#[derive(Clone, Debug, PartialEq)]
pub struct BandScale {
    count: usize,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
}

impl BandScale {
    fn step(&self) -> f64 {
        let slots = self.count as f64 - self.padding_inner + 2.0 * self.padding_outer;
        (self.range.1 - self.range.0) / slots.max(1.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }
}

/// Scale supplied by the host. Equal only to clones sharing the same mapper.
#[derive(Clone)]
pub struct CustomScale(Arc<dyn ScaleMapper>);

impl fmt::Debug for CustomScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomScale")
            .field("range", &self.0.range())
            .finish_non_exhaustive()
    }
}

impl PartialEq for CustomScale {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChartScale {
    Linear(LinearScale),
    Log(LogScale),
    Band(BandScale),
    Custom(CustomScale),
}

fn widen_flat_domain(min: f64, max: f64) -> (f64, f64) {
    if (max - min).abs() < f64::EPSILON {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    }
}

impl ChartScale {
    pub fn new_linear(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self::Linear(LinearScale {
            domain: widen_flat_domain(domain.0, domain.1),
            range,
        })
    }

    /// Log scales only map strictly positive values; a non-positive domain maps nothing.
    pub fn new_log(domain: (f64, f64), range: (f64, f64)) -> Self {
        let (mut d_min, mut d_max) = domain;
        if (d_max - d_min).abs() < f64::EPSILON {
            d_min /= 10.0;
            d_max *= 10.0;
        }
        Self::Log(LogScale {
            domain: (d_min, d_max),
            range,
        })
    }

    pub fn new_band(count: usize, range: (f64, f64)) -> Self {
        Self::Band(BandScale {
            count,
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
        })
    }

    pub fn custom(mapper: impl ScaleMapper + 'static) -> Self {
        Self::Custom(CustomScale(Arc::new(mapper)))
    }

    pub fn from_mapper(mapper: Arc<dyn ScaleMapper>) -> Self {
        Self::Custom(CustomScale(mapper))
    }

    /// Padding is clamped to [0, 1) for the inner gap and [0, ∞) for the outer margins.
    pub fn with_padding(self, inner: f64, outer: f64) -> Self {
        match self {
            Self::Band(b) => Self::Band(BandScale {
                padding_inner: inner.clamp(0.0, 0.99),
                padding_outer: outer.max(0.0),
                ..b
            }),
            other => other,
        }
    }

    /// `None` for custom scales, whose domain is opaque.
    pub fn domain(&self) -> Option<(f64, f64)> {
        match self {
            Self::Linear(s) => Some(s.domain),
            Self::Log(s) => Some(s.domain),
            Self::Band(s) => Some((0.0, s.count as f64)),
            Self::Custom(_) => None,
        }
    }

    /// Value at `position`. Custom scales cannot be inverted.
    pub fn invert(&self, position: f64) -> Option<f64> {
        let (r0, r1) = self.range();
        let span = r1 - r0;
        if span == 0.0 || !position.is_finite() {
            return None;
        }
        let t = (position - r0) / span;
        match self {
            Self::Linear(s) => Some(s.domain.0 + t * (s.domain.1 - s.domain.0)),
            Self::Log(s) => {
                if s.domain.0 <= 0.0 || s.domain.1 <= 0.0 {
                    return None;
                }
                let (l0, l1) = (s.domain.0.ln(), s.domain.1.ln());
                Some((l0 + t * (l1 - l0)).exp())
            }
            Self::Band(s) => {
                let step = s.step();
                let idx = ((position - r0) / step - s.padding_outer).floor();
                (idx >= 0.0 && idx < s.count as f64).then_some(idx)
            }
            Self::Custom(_) => None,
        }
    }
}

impl ScaleMapper for ChartScale {
    fn map(&self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        let res = match self {
            Self::Linear(s) => {
                let (d0, d1) = s.domain;
                s.range.0 + (value - d0) / (d1 - d0) * (s.range.1 - s.range.0)
            }
            Self::Log(s) => {
                let (d0, d1) = s.domain;
                if value <= 0.0 || d0 <= 0.0 || d1 <= 0.0 {
                    return None;
                }
                let t = (value.ln() - d0.ln()) / (d1.ln() - d0.ln());
                s.range.0 + t * (s.range.1 - s.range.0)
            }
            Self::Band(s) => {
                if value < 0.0 || value.fract() != 0.0 || value >= s.count as f64 {
                    return None;
                }
                let step = s.step();
                s.range.0 + step * (s.padding_outer + value) + s.bandwidth() / 2.0
            }
            Self::Custom(s) => s.0.map(value)?,
        };
        res.is_finite().then_some(res)
    }

    fn range(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.range,
            Self::Log(s) => s.range,
            Self::Band(s) => s.range,
            Self::Custom(s) => s.0.range(),
        }
    }

    fn normalize(&self, value: f64) -> Option<f64> {
        match self {
            Self::Custom(s) => s.0.normalize(value).filter(|t| t.is_finite()),
            _ => fraction_of_range(self.map(value)?, self.range()),
        }
    }
}
