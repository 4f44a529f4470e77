//! QUBO restatement of the selection objective.
//!
//! The rest of the engine maximizes `a·x − Σ_{i<j} b_ij x_i x_j`; minimum
//! finders want the negation:
//!
//! ```text
//! minimize  Σ_i (−a_i) x_i + Σ_{i<j} b_ij x_i x_j
//! ```
//!
//! Spin backends use the Ising form obtained with `x_i = (1 − s_i) / 2`,
//! `s_i ∈ {+1, −1}`:
//!
//! ```text
//! E(s) = offset + Σ_i h_i s_i + Σ_{i<j} J_ij s_i s_j
//! ```
//!
//! The two energies agree exactly on corresponding assignments.

use crate::objective::Objective;

/// Quadratic unconstrained binary minimization problem.
#[derive(Debug, Clone, PartialEq)]
pub struct Qubo {
    /// Linear coefficient per variable.
    pub linear: Vec<f64>,
    /// `(i, j, q_ij)` with `i < j`; zero couplings are omitted.
    pub quadratic: Vec<(usize, usize, f64)>,
}

impl Qubo {
    /// Negate the linear part of `objective` and keep its pair penalties.
    #[must_use]
    pub fn from_objective(objective: &Objective) -> Self {
        let n = objective.len();
        let linear = objective.linear().iter().map(|a| -a).collect();

        let mut quadratic = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                let q = objective.quadratic()[(i, j)];
                if q.abs() > 0.0 {
                    quadratic.push((i, j, q));
                }
            }
        }

        Self { linear, quadratic }
    }

    #[must_use]
    pub fn num_variables(&self) -> usize {
        self.linear.len()
    }

    /// Energy of a binary assignment.
    #[must_use]
    pub fn energy(&self, x: &[bool]) -> f64 {
        let linear: f64 = self
            .linear
            .iter()
            .zip(x)
            .filter(|&(_, &bit)| bit)
            .map(|(c, _)| c)
            .sum();
        let quadratic: f64 = self
            .quadratic
            .iter()
            .filter(|&&(i, j, _)| x[i] && x[j])
            .map(|&(_, _, q)| q)
            .sum();
        linear + quadratic
    }

    /// Equivalent spin-glass form.
    #[must_use]
    pub fn to_ising(&self) -> Ising {
        let mut fields: Vec<f64> = self.linear.iter().map(|c| -c / 2.0).collect();
        let mut offset: f64 = self.linear.iter().map(|c| c / 2.0).sum();
        let mut couplings = Vec::with_capacity(self.quadratic.len());

        for &(i, j, q) in &self.quadratic {
            let quarter = q / 4.0;
            fields[i] -= quarter;
            fields[j] -= quarter;
            offset += quarter;
            couplings.push((i, j, quarter));
        }

        Ising {
            fields,
            couplings,
            offset,
        }
    }
}

/// Ising Hamiltonian with a constant offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Ising {
    /// `h_i`.
    pub fields: Vec<f64>,
    /// `(i, j, J_ij)` with `i < j`.
    pub couplings: Vec<(usize, usize, f64)>,
    pub offset: f64,
}

impl Ising {
    #[must_use]
    pub fn num_spins(&self) -> usize {
        self.fields.len()
    }

    /// Energy of a spin configuration (`+1`/`−1` entries).
    #[must_use]
    pub fn energy(&self, spins: &[i8]) -> f64 {
        let field: f64 = self
            .fields
            .iter()
            .zip(spins)
            .map(|(h, &s)| h * f64::from(s))
            .sum();
        let coupling: f64 = self
            .couplings
            .iter()
            .map(|&(i, j, w)| w * f64::from(spins[i] * spins[j]))
            .sum();
        self.offset + field + coupling
    }
}

/// `x = 0 ↔ s = +1`, `x = 1 ↔ s = −1`.
#[must_use]
pub fn bits_to_spins(bits: &[bool]) -> Vec<i8> {
    bits.iter().map(|&b| if b { -1 } else { 1 }).collect()
}

#[must_use]
pub fn spins_to_bits(spins: &[i8]) -> Vec<bool> {
    spins.iter().map(|&s| s < 0).collect()
}
