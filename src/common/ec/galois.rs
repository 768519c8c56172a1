use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Sub};

use crate::common::error::{QRError, QRResult};

// Galois field element of GF(256)
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct G(pub u8);

impl G {
    // Generator α raised to i
    pub fn gen_pow(i: usize) -> Self {
        Self(EXP_TABLE[i % 255])
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn log(self) -> usize {
        debug_assert!(self.0 != 0, "Log of zero is undefined");
        LOG_TABLE[self.0 as usize] as usize
    }

    pub fn pow(self, k: usize) -> Self {
        match (self.0, k) {
            (_, 0) => Self(1),
            (0, _) => Self(0),
            _ => Self(EXP_TABLE[(self.log() * k) % 255]),
        }
    }

    pub fn checked_div(self, rhs: Self) -> QRResult<Self> {
        if rhs.0 == 0 {
            return Err(QRError::DivideByZero);
        }
        if self.0 == 0 {
            return Ok(Self(0));
        }
        Ok(Self(EXP_TABLE[(self.log() + 255 - rhs.log()) % 255]))
    }

    pub fn inverse(self) -> QRResult<Self> {
        Self(1).checked_div(self)
    }
}

impl From<G> for u8 {
    fn from(g: G) -> Self {
        g.0
    }
}

// Field operations
//------------------------------------------------------------------------------

impl Add for G {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 ^ rhs.0)
    }
}

impl AddAssign for G {
    fn add_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Sub for G {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 ^ rhs.0)
    }
}

impl Mul for G {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        if self.0 == 0 || rhs.0 == 0 {
            return Self(0);
        }
        Self(EXP_TABLE[(self.log() + rhs.log()) % 255])
    }
}

impl MulAssign for G {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

// Panics on a zero divisor, like integer division
impl Div for G {
    type Output = Self;
    fn div(self, rhs: Self) -> Self::Output {
        match self.checked_div(rhs) {
            Ok(q) => q,
            Err(_) => panic!("Division by zero in GF(256)"),
        }
    }
}


// Global constants
//------------------------------------------------------------------------------

pub const PRIMITIVE_POLY: u16 = 0x11D;

pub const EXP_TABLE: [u8; 256] = build_exp_table();

pub const LOG_TABLE: [u8; 256] = build_log_table(&EXP_TABLE);

const fn build_exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        table[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE_POLY;
        }
        i += 1;
    }
    table[255] = table[0];
    table
}

const fn build_log_table(exp: &[u8; 256]) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}
