//! Lag polynomials in the backshift operator `B`.

/// Polynomial `1 + c_1 B + c_2 B^2 + ... + c_k B^k`.
///
/// Stored as `[1, c_1, ..., c_k]`; the leading coefficient is always 1.
#[derive(Debug, Clone, PartialEq)]
pub struct LagPolynomial {
    coefficients: Vec<f64>,
}

impl LagPolynomial {
    /// The identity polynomial `1`.
    pub fn one() -> Self {
        Self {
            coefficients: vec![1.0],
        }
    }

    /// `1 + sign * (c_1 B^step + c_2 B^{2 step} + ...)`.
    ///
    /// AR polynomials use `sign = -1`, MA polynomials `sign = +1`.
    pub fn from_lags(sign: f64, lags: &[f64], step: usize) -> Self {
        if lags.is_empty() || step == 0 {
            return Self::one();
        }
        let mut coefficients = vec![0.0; lags.len() * step + 1];
        coefficients[0] = 1.0;
        for (i, c) in lags.iter().enumerate() {
            coefficients[(i + 1) * step] = sign * c;
        }
        Self { coefficients }
    }

    /// Product of two polynomials.
    pub fn multiply(&self, other: &Self) -> Self {
        let mut coefficients = vec![0.0; self.coefficients.len() + other.coefficients.len() - 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            if *a == 0.0 {
                continue;
            }
            for (j, b) in other.coefficients.iter().enumerate() {
                coefficients[i + j] += a * b;
            }
        }
        Self { coefficients }
    }

    /// The polynomial raised to a non-negative integer power.
    pub fn pow(&self, exponent: usize) -> Self {
        (0..exponent).fold(Self::one(), |acc, _| acc.multiply(self))
    }

    /// Highest lag with a coefficient slot.
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// All coefficients, starting with the constant 1.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Coefficients of `B^1 .. B^k`.
    pub fn lag_terms(&self) -> &[f64] {
        &self.coefficients[1..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn from_lags_places_seasonal_terms() {
        let poly = LagPolynomial::from_lags(-1.0, &[0.5, 0.25], 4);
        assert_eq!(poly.degree(), 8);
        assert_eq!(poly.coefficients()[4], -0.5);
        assert_eq!(poly.coefficients()[8], -0.25);
        assert_eq!(poly.coefficients()[1], 0.0);
    }

    #[test]
    fn multiplicative_ar_polynomial() {
        // (1 - 0.5B)(1 - 0.3B^12) = 1 - 0.5B - 0.3B^12 + 0.15B^13
        let regular = LagPolynomial::from_lags(-1.0, &[0.5], 1);
        let seasonal = LagPolynomial::from_lags(-1.0, &[0.3], 12);
        let product = regular.multiply(&seasonal);

        assert_eq!(product.degree(), 13);
        assert_relative_eq!(product.coefficients()[1], -0.5);
        assert_relative_eq!(product.coefficients()[12], -0.3);
        assert_relative_eq!(product.coefficients()[13], 0.15);
    }

    #[test]
    fn binomial_power() {
        // (1 - B)^3 = 1 - 3B + 3B^2 - B^3
        let poly = LagPolynomial::from_lags(-1.0, &[1.0], 1).pow(3);
        assert_eq!(poly.coefficients(), &[1.0, -3.0, 3.0, -1.0]);
        assert_eq!(LagPolynomial::from_lags(-1.0, &[1.0], 1).pow(0), LagPolynomial::one());
    }

    #[test]
    fn empty_lags_give_identity() {
        let poly = LagPolynomial::from_lags(1.0, &[], 12);
        assert_eq!(poly.degree(), 0);
        assert!(poly.lag_terms().is_empty());
    }
}
