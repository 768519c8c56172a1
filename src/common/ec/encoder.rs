use super::galois::G;

// Generator polynomial, highest degree first: (x - α^0)(x - α^1)...(x - α^(n-1))
//------------------------------------------------------------------------------

pub fn generator_polynomial(ec_len: usize) -> Vec<G> {
    let mut gen = vec![G(1)];
    for i in 0..ec_len {
        let root = G::gen_pow(i);
        let mut next = vec![G(0); gen.len() + 1];
        for (j, &coeff) in gen.iter().enumerate() {
            next[j] += coeff;
            next[j + 1] += coeff * root;
        }
        gen = next;
    }
    gen
}

// ECC: remainder of data(x) * x^n divided by the generator polynomial
//------------------------------------------------------------------------------

pub fn ecc(data: &[u8], ec_len: usize) -> Vec<u8> {
    debug_assert!(ec_len > 0, "Error correction length must be positive");

    let gen = generator_polynomial(ec_len);
    let mut rem = vec![G(0); ec_len];
    for &b in data {
        let factor = G(b) + rem[0];
        rem.rotate_left(1);
        rem[ec_len - 1] = G(0);
        if factor.is_zero() {
            continue;
        }
        for (r, &g) in rem.iter_mut().zip(gen[1..].iter()) {
            *r += g * factor;
        }
    }
    rem.into_iter().map(u8::from).collect()
}

#[cfg(test)]
mod ec_encoder_tests {
    use super::{ecc, generator_polynomial, G};

    #[test]
    fn test_generator_polynomial() {
        let gen = generator_polynomial(2);
        assert_eq!(gen, vec![G(1), G(3), G(2)]);
        let gen = generator_polynomial(7).into_iter().map(u8::from).collect::<Vec<_>>();
        assert_eq!(gen, vec![1, 127, 122, 154, 164, 11, 68, 117]);
    }

    #[test]
    fn test_poly_mod_1() {
        let res = ecc(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11", 10);
        assert_eq!(&*res, b"\xc4#'w\xeb\xd7\xe7\xe2]\x17");
    }

    #[test]
    fn test_poly_mod_2() {
        let res = ecc(b"CUF\x86W&U\xc2w2\x06\x12\x06g&", 18);
        assert_eq!(&*res, b"\xd5\xc7\x0b-s\xf7\xf1\xdf\xe5\xf8\x9au\x9aoV\xa1o'");
    }

    #[test]
    fn test_poly_mod_3() {
        let data = [32, 91, 11, 45, 89, 123, 77, 44, 56, 99, 202];
        assert_eq!(ecc(&data, 4), vec![21, 197, 229, 186]);
    }

    #[test]
    fn test_zero_data() {
        assert_eq!(ecc(&[0; 16], 10), vec![0; 10]);
    }
}
