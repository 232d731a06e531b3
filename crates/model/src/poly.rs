//! Quadratic polynomials over binary decision variables.
//!
//! Terms live in ordered maps so iteration, and therefore evaluation, is
//! bit-for-bit reproducible. Because every variable is 0/1, `x * x` folds
//! into the linear term `x`.

use crate::error::ModelError;
use crate::variables::{Assignment, VarId};
use std::collections::BTreeMap;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polynomial {
    constant: f64,
    linear: BTreeMap<VarId, f64>,
    quadratic: BTreeMap<(VarId, VarId), f64>,
}

impl Polynomial {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn constant(value: f64) -> Self {
        Self {
            constant: value,
            ..Self::default()
        }
    }

    /// `coefficient * x_var`
    pub fn term(var: VarId, coefficient: f64) -> Self {
        let mut poly = Self::zero();
        poly.add_linear(var, coefficient);
        poly
    }

    pub fn variable(var: VarId) -> Self {
        Self::term(var, 1.0)
    }

    pub fn add_constant(&mut self, value: f64) {
        self.constant += value;
    }

    pub fn add_linear(&mut self, var: VarId, coefficient: f64) {
        *self.linear.entry(var).or_insert(0.0) += coefficient;
    }

    pub fn add_quadratic(&mut self, a: VarId, b: VarId, coefficient: f64) {
        if a == b {
            self.add_linear(a, coefficient);
            return;
        }
        let key = if a < b { (a, b) } else { (b, a) };
        *self.quadratic.entry(key).or_insert(0.0) += coefficient;
    }

    pub fn constant_term(&self) -> f64 {
        self.constant
    }

    /// Coefficient of `x_var`; zero when the variable has no linear term.
    pub fn linear_coefficient(&self, var: VarId) -> f64 {
        self.linear.get(&var).copied().unwrap_or(0.0)
    }

    pub fn quadratic_coefficient(&self, a: VarId, b: VarId) -> f64 {
        if a == b {
            return 0.0;
        }
        let key = if a < b { (a, b) } else { (b, a) };
        self.quadratic.get(&key).copied().unwrap_or(0.0)
    }

    pub fn linear_terms(&self) -> impl Iterator<Item = (VarId, f64)> + '_ {
        self.linear.iter().map(|(var, c)| (*var, *c))
    }

    pub fn quadratic_terms(&self) -> impl Iterator<Item = ((VarId, VarId), f64)> + '_ {
        self.quadratic.iter().map(|(pair, c)| (*pair, *c))
    }

    /// Whether `var` appears in any term.
    pub fn mentions(&self, var: VarId) -> bool {
        self.linear.contains_key(&var)
            || self.quadratic.keys().any(|(a, b)| *a == var || *b == var)
    }

    /// One past the highest variable id referenced.
    pub fn num_variables(&self) -> usize {
        let linear_max = self.linear.keys().next_back().copied();
        let quad_max = self.quadratic.keys().map(|(_, b)| *b).max();
        linear_max
            .into_iter()
            .chain(quad_max)
            .max()
            .map(|max| max + 1)
            .unwrap_or(0)
    }

    pub fn degree(&self) -> usize {
        if !self.quadratic.is_empty() {
            2
        } else if !self.linear.is_empty() {
            1
        } else {
            0
        }
    }

    /// Value at an assignment; unassigned variables count as 0.
    pub fn evaluate(&self, assignment: &Assignment) -> f64 {
        self.evaluate_with(|var| assignment.get(var).unwrap_or(0.0))
    }

    pub fn evaluate_bits(&self, bits: &[bool]) -> f64 {
        self.evaluate_with(|var| match bits.get(var) {
            Some(true) => 1.0,
            _ => 0.0,
        })
    }

    pub fn evaluate_with(&self, value: impl Fn(VarId) -> f64) -> f64 {
        let mut total = self.constant;
        for (var, c) in &self.linear {
            total += c * value(*var);
        }
        for ((a, b), c) in &self.quadratic {
            total += c * value(*a) * value(*b);
        }
        total
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            constant: self.constant * factor,
            linear: self.linear.iter().map(|(v, c)| (*v, c * factor)).collect(),
            quadratic: self
                .quadratic
                .iter()
                .map(|(p, c)| (*p, c * factor))
                .collect(),
        }
    }

    /// Product of two polynomials; fails if the result would exceed degree 2.
    pub fn try_mul(&self, other: &Polynomial) -> Result<Polynomial, ModelError> {
        let degree = self.degree() + other.degree();
        if degree > 2 {
            // Only quadratic models are representable.
            return Err(ModelError::DegreeOverflow { degree });
        }

        let mut out = Polynomial::constant(self.constant * other.constant);
        for (var, c) in &other.linear {
            out.add_linear(*var, self.constant * c);
        }
        for (pair, c) in &other.quadratic {
            out.add_quadratic(pair.0, pair.1, self.constant * c);
        }
        for (var, c) in &self.linear {
            out.add_linear(*var, c * other.constant);
            for (other_var, other_c) in &other.linear {
                out.add_quadratic(*var, *other_var, c * other_c);
            }
        }
        for (pair, c) in &self.quadratic {
            out.add_quadratic(pair.0, pair.1, c * other.constant);
        }
        Ok(out)
    }

    pub fn square(&self) -> Result<Polynomial, ModelError> {
        self.try_mul(self)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.constant)?;
        for (var, c) in &self.linear {
            write!(f, " + {}*q{}", c, var)?;
        }
        for ((a, b), c) in &self.quadratic {
            write!(f, " + {}*q{}*q{}", c, a, b)?;
        }
        Ok(())
    }
}

impl AddAssign<&Polynomial> for Polynomial {
    fn add_assign(&mut self, rhs: &Polynomial) {
        self.constant += rhs.constant;
        for (var, c) in &rhs.linear {
            self.add_linear(*var, *c);
        }
        for (pair, c) in &rhs.quadratic {
            self.add_quadratic(pair.0, pair.1, *c);
        }
    }
}

impl AddAssign for Polynomial {
    fn add_assign(&mut self, rhs: Polynomial) {
        *self += &rhs;
    }
}

impl SubAssign<&Polynomial> for Polynomial {
    fn sub_assign(&mut self, rhs: &Polynomial) {
        *self += &rhs.scaled(-1.0);
    }
}

impl Add for Polynomial {
    type Output = Polynomial;

    fn add(mut self, rhs: Polynomial) -> Polynomial {
        self += &rhs;
        self
    }
}

impl Add<f64> for Polynomial {
    type Output = Polynomial;

    fn add(mut self, rhs: f64) -> Polynomial {
        self.constant += rhs;
        self
    }
}

impl Sub for Polynomial {
    type Output = Polynomial;

    fn sub(mut self, rhs: Polynomial) -> Polynomial {
        self -= &rhs;
        self
    }
}

impl Sub<f64> for Polynomial {
    type Output = Polynomial;

    fn sub(mut self, rhs: f64) -> Polynomial {
        self.constant -= rhs;
        self
    }
}

impl Mul<f64> for Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: f64) -> Polynomial {
        self.scaled(rhs)
    }
}

impl Mul<f64> for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: f64) -> Polynomial {
        self.scaled(rhs)
    }
}

impl Div<f64> for &Polynomial {
    type Output = Polynomial;

    fn div(self, rhs: f64) -> Polynomial {
        self.scaled(1.0 / rhs)
    }
}

impl Neg for Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        self.scaled(-1.0)
    }
}

impl Sum for Polynomial {
    fn sum<I: Iterator<Item = Polynomial>>(iter: I) -> Polynomial {
        iter.fold(Polynomial::zero(), |acc, p| acc + p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_square_folds_to_linear() {
        let x = Polynomial::variable(0);
        let sq = x.square().unwrap();
        assert_eq!(sq.degree(), 1);
        assert_eq!(sq.linear_coefficient(0), 1.0);
    }

    #[test]
    fn test_square_of_affine() {
        // (2 q0 + 3 q1 - 4)^2 = 4q0 + 9q1 + 12 q0 q1 - 16 q0 - 24 q1 + 16
        let p = Polynomial::term(0, 2.0) + Polynomial::term(1, 3.0) - 4.0;
        let sq = p.square().unwrap();
        assert_eq!(sq.constant_term(), 16.0);
        assert_eq!(sq.linear_coefficient(0), -12.0);
        assert_eq!(sq.linear_coefficient(1), -15.0);
        assert_eq!(sq.quadratic_coefficient(0, 1), 12.0);
        assert_eq!(sq.quadratic_coefficient(1, 0), 12.0);

        for bits in [[false, false], [true, false], [false, true], [true, true]] {
            let direct = p.evaluate_bits(&bits).powi(2);
            assert!((sq.evaluate_bits(&bits) - direct).abs() < 1e-9);
        }
    }

    #[test]
    fn test_degree_overflow() {
        let p = Polynomial::variable(0).try_mul(&Polynomial::variable(1)).unwrap();
        assert_eq!(p.degree(), 2);
        let err = p.try_mul(&Polynomial::variable(2)).unwrap_err();
        assert!(matches!(err, ModelError::DegreeOverflow { degree: 3 }));
    }

    #[test]
    fn test_evaluate_missing_variable_is_zero() {
        let p = Polynomial::term(0, 1.5) + Polynomial::term(3, 2.0) + 1.0;
        let assignment = Assignment::from_bits(&[true]);
        assert_eq!(p.evaluate(&assignment), 2.5);
        assert_eq!(p.num_variables(), 4);
    }

    #[test]
    fn test_scaling_and_division() {
        let p = Polynomial::term(0, 4.0) + 2.0;
        let half = &p / 2.0;
        assert_eq!(half.linear_coefficient(0), 2.0);
        assert_eq!(half.constant_term(), 1.0);
        assert_eq!((-p).constant_term(), -2.0);
    }
}
