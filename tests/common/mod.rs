//! Shared helpers: an in-memory SPK writer so the reader and evaluators can be
//! exercised without real JPL kernels, in both byte orders.

#![allow(dead_code)]

pub const RCRD_LEN: usize = 1024;

pub struct SegmentDef {
    pub name: &'static str,
    pub target: i32,
    pub center: i32,
    pub frame: i32,
    pub data_type: i32,
    pub start_et_s: f64,
    pub end_et_s: f64,
    pub data: Vec<f64>,
}

pub struct SpkBuilder {
    pub big_endian: bool,
    pub segments: Vec<SegmentDef>,
}

impl SpkBuilder {
    pub fn new(big_endian: bool) -> Self {
        Self {
            big_endian,
            segments: Vec::new(),
        }
    }

    pub fn segment(mut self, seg: SegmentDef) -> Self {
        self.segments.push(seg);
        self
    }

    fn put_f64(&self, out: &mut Vec<u8>, v: f64) {
        if self.big_endian {
            out.extend_from_slice(&v.to_be_bytes());
        } else {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }

    fn put_u32(&self, out: &mut Vec<u8>, v: u32) {
        if self.big_endian {
            out.extend_from_slice(&v.to_be_bytes());
        } else {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }

    fn put_i32(&self, out: &mut Vec<u8>, v: i32) {
        if self.big_endian {
            out.extend_from_slice(&v.to_be_bytes());
        } else {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }

    /// Lays the file out as: file record, one summary record (record 2), one name
    /// record (record 3), then the segment data from record 4 on.
    pub fn build(&self) -> Vec<u8> {
        // 1-based word address where the data area starts (record 4).
        let data_start_word = 3 * RCRD_LEN / 8 + 1;
        let mut word = data_start_word;
        let mut ranges = Vec::new();
        for seg in &self.segments {
            let start = word;
            let end = word + seg.data.len() - 1;
            ranges.push((start, end));
            word = end + 1;
        }

        let mut out = Vec::new();

        // File record
        out.extend_from_slice(b"DAF/SPK ");
        self.put_u32(&mut out, 2); // ND
        self.put_u32(&mut out, 6); // NI
        out.extend_from_slice(&[b' '; 60]); // internal filename
        self.put_u32(&mut out, 2); // FWARD
        self.put_u32(&mut out, 2); // BWARD
        self.put_u32(&mut out, word as u32); // first free address
        out.extend_from_slice(if self.big_endian {
            b"BIG-IEEE"
        } else {
            b"LTL-IEEE"
        });
        out.resize(RCRD_LEN, 0);

        // Summary record
        self.put_f64(&mut out, 0.0); // next
        self.put_f64(&mut out, 0.0); // prev
        self.put_f64(&mut out, self.segments.len() as f64);
        for (seg, (start, end)) in self.segments.iter().zip(&ranges) {
            self.put_f64(&mut out, seg.start_et_s);
            self.put_f64(&mut out, seg.end_et_s);
            self.put_i32(&mut out, seg.target);
            self.put_i32(&mut out, seg.center);
            self.put_i32(&mut out, seg.frame);
            self.put_i32(&mut out, seg.data_type);
            self.put_i32(&mut out, *start as i32);
            self.put_i32(&mut out, *end as i32);
        }
        out.resize(2 * RCRD_LEN, 0);

        // Name record
        for seg in &self.segments {
            let mut name = [b' '; 40];
            let len = seg.name.len().min(40);
            name[..len].copy_from_slice(&seg.name.as_bytes()[..len]);
            out.extend_from_slice(&name);
        }
        out.resize(3 * RCRD_LEN, 0);

        // Data area
        for seg in &self.segments {
            for v in &seg.data {
                self.put_f64(&mut out, *v);
            }
        }
        let padded = out.len().div_ceil(RCRD_LEN) * RCRD_LEN;
        out.resize(padded, 0);
        out
    }
}

/// Builds the data area of a Chebyshev segment (types 2 and 3): the records followed
/// by the `(init, intlen, rsize, n)` directory.
pub fn chebyshev_segment_data(
    init_et_s: f64,
    interval_s: f64,
    records: &[Vec<f64>],
) -> (Vec<f64>, f64) {
    let rsize = records[0].len();
    let mut data = Vec::new();
    for rec in records {
        assert_eq!(rec.len(), rsize);
        data.extend_from_slice(rec);
    }
    data.push(init_et_s);
    data.push(interval_s);
    data.push(rsize as f64);
    data.push(records.len() as f64);
    let end_et_s = init_et_s + interval_s * records.len() as f64;
    (data, end_et_s)
}

/// Chebyshev coefficients of the derivative of the series with plain-sum convention,
/// scaled from per-tau to per-second via the interval radius.
pub fn chebyshev_derivative(coeffs: &[f64], radius_s: f64) -> Vec<f64> {
    let n = coeffs.len();
    let mut deriv = vec![0.0_f64; n];
    if n < 2 {
        return deriv;
    }
    for j in (0..n - 1).rev() {
        let above = if j + 2 < n { deriv[j + 2] } else { 0.0 };
        deriv[j] = above + 2.0 * (j + 1) as f64 * coeffs[j + 1];
    }
    deriv[0] *= 0.5;
    for d in deriv.iter_mut() {
        *d /= radius_s;
    }
    deriv
}

/// Direct evaluation of a plain-sum Chebyshev series, for cross-checking Clenshaw.
pub fn chebyshev_direct(coeffs: &[f64], tau: f64) -> f64 {
    let mut t_prev = 1.0;
    let mut t_curr = tau;
    let mut sum = coeffs[0];
    for (k, c) in coeffs.iter().enumerate().skip(1) {
        if k == 1 {
            sum += c * t_curr;
        } else {
            let t_next = 2.0 * tau * t_curr - t_prev;
            t_prev = t_curr;
            t_curr = t_next;
            sum += c * t_curr;
        }
    }
    sum
}

/// A 71-double Type 1 record with the provided reference state and epoch.
pub fn mda_record(ref_epoch: f64, pos: [f64; 3], vel: [f64; 3]) -> Vec<f64> {
    let mut rcrd = vec![0.0_f64; 71];
    rcrd[0] = ref_epoch;
    for g in rcrd.iter_mut().take(16).skip(1) {
        *g = 16.0;
    }
    for i in 0..3 {
        rcrd[16 + 2 * i] = pos[i];
        rcrd[17 + 2 * i] = vel[i];
    }
    // Mild differences so the polynomial part is exercised
    for i in 0..3 {
        for j in 0..4 {
            rcrd[22 + i * 15 + j] = 1e-6 / ((j + 1) as f64);
        }
    }
    rcrd[67] = 6.0; // kqmax1
    rcrd[68] = 4.0;
    rcrd[69] = 4.0;
    rcrd[70] = 4.0;
    rcrd
}

/// The data area of a Type 1 segment: `n` records, their epochs, and the count.
pub fn mda_segment_data(records: &[Vec<f64>], epochs: &[f64]) -> Vec<f64> {
    assert_eq!(records.len(), epochs.len());
    let mut data = Vec::new();
    for rec in records {
        assert_eq!(rec.len(), 71);
        data.extend_from_slice(rec);
    }
    data.extend_from_slice(epochs);
    data.push(records.len() as f64);
    data
}
