//! Reed-Solomon error correction codeword generation over GF(256).

// Galois field tables, generated from the QR polynomial x^8 + x^4 + x^3 + x^2 + 1
//------------------------------------------------------------------------------

const GF_POLY: u16 = 0x11D;

const fn build_exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        table[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= GF_POLY;
        }
        i += 1;
    }
    table[255] = table[0];
    table
}

const fn build_log_table() -> [u8; 256] {
    let exp = build_exp_table();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

static EXP_TABLE: [u8; 256] = build_exp_table();
static LOG_TABLE: [u8; 256] = build_log_table();

fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let log_sum = LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize;
    EXP_TABLE[log_sum % 255]
}

// Generator polynomial: the product of (x - α^i) for i in 0..ecc_count,
// coefficients highest degree first with the leading 1 included
fn generator_polynomial(ecc_count: usize) -> Vec<u8> {
    let mut poly = vec![1u8];
    let mut root = 1u8;
    for _ in 0..ecc_count {
        let mut next = vec![0u8; poly.len() + 1];
        for (i, &coeff) in poly.iter().enumerate() {
            next[i] ^= coeff;
            next[i + 1] ^= gf_mul(coeff, root);
        }
        poly = next;
        root = gf_mul(root, 2);
    }
    poly
}

// Performs polynomial long division with data polynomial(num)
// and generator polynomial(den) to compute remainder polynomial,
// the coefficients of which are the ecc
pub fn ecc(block: &[u8], ecc_count: usize) -> Vec<u8> {
    let len = block.len();
    let gen_poly = generator_polynomial(ecc_count);

    let mut res = block.to_vec();
    res.resize(len + ecc_count, 0);

    for i in 0..len {
        let lead_coeff = res[i];
        if lead_coeff == 0 {
            continue;
        }
        for (u, &v) in res[i + 1..].iter_mut().zip(gen_poly[1..].iter()) {
            *u ^= gf_mul(v, lead_coeff);
        }
    }

    res.split_off(len)
}
