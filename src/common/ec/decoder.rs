use log::trace;

use super::{galois::G, Block};
use crate::common::error::{QRError, QRResult};

// Rectifier
//------------------------------------------------------------------------------

impl Block {
    // Corrects the block in place and returns the number of corrected codewords
    pub fn rectify(&mut self) -> QRResult<usize> {
        let synd = match self.syndromes() {
            None => return Ok(0),
            Some(s) => s,
        };

        let ec_len = self.ec_len();

        // Error locator polynomial
        let (sig, lfsr_len) = berlekamp_massey(&synd);
        let deg = degree(&sig);
        if lfsr_len * 2 > ec_len || deg != lfsr_len {
            return Err(QRError::UncorrectableBlock);
        }

        let err_pos = self.chien_search(&sig[..=deg])?;

        // Error evaluator & sigma derivative
        let omg = omega(&synd, &sig[..=deg]);
        let dsig = formal_derivative(&sig[..=deg]);

        let len = self.len();
        for &p in &err_pos {
            let x = G::gen_pow(p);
            let xinv = x.inverse().or(Err(QRError::UncorrectableBlock))?;
            let num = x * eval_poly(&omg, xinv);
            let den = eval_poly(&dsig, xinv);
            let mag = num.checked_div(den).or(Err(QRError::UncorrectableBlock))?;
            let byte = &mut self.full_mut()[len - 1 - p];
            *byte = (G(*byte) + mag).into();
        }

        if self.syndromes().is_some() {
            return Err(QRError::UncorrectableBlock);
        }

        trace!("Rectified {} codewords in block of length {len}", err_pos.len());
        Ok(err_pos.len())
    }

    // S_i = r(α^i), None if every syndrome is zero
    fn syndromes(&self) -> Option<Vec<G>> {
        let synd = (0..self.ec_len())
            .map(|i| {
                let x = G::gen_pow(i);
                self.full().iter().fold(G(0), |acc, &b| acc * x + G(b))
            })
            .collect::<Vec<_>>();

        if synd.iter().all(|s| s.is_zero()) {
            None
        } else {
            Some(synd)
        }
    }

    // Error positions as powers of x, counted from the last codeword
    fn chien_search(&self, sig: &[G]) -> QRResult<Vec<usize>> {
        let deg = sig.len() - 1;
        let mut err_pos = Vec::with_capacity(deg);
        for i in 0..255 {
            if !eval_poly(sig, G::gen_pow(i)).is_zero() {
                continue;
            }
            let p = (255 - i) % 255;
            if p >= self.len() {
                return Err(QRError::UncorrectableBlock);
            }
            err_pos.push(p);
        }

        if err_pos.len() != deg {
            return Err(QRError::UncorrectableBlock);
        }
        Ok(err_pos)
    }
}

// Sigma polynomial, lowest degree first, with its LFSR length
fn berlekamp_massey(synd: &[G]) -> (Vec<G>, usize) {
    let n = synd.len();
    let mut cx = vec![G(0); n + 1];
    let mut bx = vec![G(0); n + 1];
    cx[0] = G(1);
    bx[0] = G(1);
    let mut l = 0usize;
    let mut m = 1usize;
    let mut b = G(1);

    for k in 0..n {
        // Discrepancy
        let mut d = synd[k];
        for i in 1..=l {
            d += cx[i] * synd[k - i];
        }

        if d.is_zero() {
            m += 1;
            continue;
        }

        let tx = cx.clone();
        let scale = d / b;
        for i in 0..=n - m {
            cx[i + m] += scale * bx[i];
        }

        if 2 * l <= k {
            l = k + 1 - l;
            bx = tx;
            b = d;
            m = 1;
        } else {
            m += 1;
        }
    }
    (cx, l)
}

// Ω(x) = S(x)σ(x) mod x^n
fn omega(synd: &[G], sig: &[G]) -> Vec<G> {
    let n = synd.len();
    let mut omg = vec![G(0); n];
    for (i, &s) in synd.iter().enumerate() {
        for (j, &c) in sig.iter().enumerate().take(n - i) {
            omg[i + j] += s * c;
        }
    }
    omg
}

// Odd terms survive in characteristic 2
fn formal_derivative(sig: &[G]) -> Vec<G> {
    let mut dsig = vec![G(0); sig.len().saturating_sub(1)];
    for i in (1..sig.len()).step_by(2) {
        dsig[i - 1] = sig[i];
    }
    dsig
}

fn degree(poly: &[G]) -> usize {
    poly.iter().rposition(|c| !c.is_zero()).unwrap_or(0)
}

// Horner evaluation, lowest degree first
fn eval_poly(poly: &[G], x: G) -> G {
    poly.iter().rev().fold(G(0), |acc, &c| acc * x + c)
}


// Rectifier for format and version infos
//------------------------------------------------------------------------------

// Nearest valid codeword by Hamming distance, if within capacity
pub fn rectify_info(info: u32, valid_numbers: &[u32], err_capacity: u32) -> Option<u32> {
    valid_numbers
        .iter()
        .copied()
        .min_by_key(|&n| (info ^ n).count_ones())
        .filter(|&n| (info ^ n).count_ones() <= err_capacity)
}
