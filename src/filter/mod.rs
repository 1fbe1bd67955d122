//! FIR band-pass filtering.
//!
//! - [`design`]: Hamming-windowed sinc band-pass with MNE's automatic
//!   transition bandwidths and length.
//! - [`apply`]: zero-phase FFT overlap-add convolution with reflect-limited
//!   edge padding.

pub mod apply;
pub mod design;

pub use apply::{apply_fir_zero_phase, filter_1d, OverlapAdd};
pub use design::{
    auto_filter_length, auto_trans_bandwidth_high, auto_trans_bandwidth_low, design_bandpass,
    gain_at, hamming, windowed_sinc,
};
