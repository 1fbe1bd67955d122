/// Shared helpers: synthetic EDF recordings and dataset trees.
use std::f64::consts::PI;
use std::path::Path;

/// Digital units per microvolt in files written by [`write_edf`].
#[allow(unused)]
pub const DIGITAL_PER_UV: f64 = 10.0;

fn field(out: &mut Vec<u8>, value: &str, len: usize) {
    let mut bytes = value.as_bytes().to_vec();
    bytes.resize(len, b' ');
    out.extend_from_slice(&bytes[..len]);
}

#[allow(unused)]
/// Write a 16-bit EDF file with 1-second records.
///
/// `signal(ch, t)` returns the value of channel `ch` at sample `t` in microvolts
/// (representable range ±3276.7 µV, resolution 0.1 µV).
pub fn write_edf<F>(path: &Path, labels: &[&str], sfreq: usize, seconds: usize, signal: F)
where
    F: Fn(usize, usize) -> f64,
{
    write_edf_rates(path, labels, &vec![sfreq; labels.len()], seconds, signal);
}

#[allow(unused)]
/// [`write_edf`] with one sampling rate per signal; `t` counts samples of
/// that signal.
pub fn write_edf_rates<F>(path: &Path, labels: &[&str], rates: &[usize], seconds: usize, signal: F)
where
    F: Fn(usize, usize) -> f64,
{
    assert_eq!(labels.len(), rates.len());
    let ns = labels.len();
    let mut out = Vec::new();
    field(&mut out, "0", 8);
    field(&mut out, "X X X X", 80);
    field(&mut out, "Startdate X X X X", 80);
    field(&mut out, "01.01.01", 8);
    field(&mut out, "00.00.00", 8);
    field(&mut out, &(256 * (ns + 1)).to_string(), 8);
    field(&mut out, "", 44);
    field(&mut out, &seconds.to_string(), 8);
    field(&mut out, "1", 8);
    field(&mut out, &ns.to_string(), 4);

    let per_signal = |v: &str| vec![v.to_string(); ns];
    let columns: Vec<(usize, Vec<String>)> = vec![
        (16, labels.iter().map(|s| s.to_string()).collect()),
        (80, per_signal("")),
        (8, per_signal("uV")),
        (8, per_signal("-3276.8")),
        (8, per_signal("3276.7")),
        (8, per_signal("-32768")),
        (8, per_signal("32767")),
        (80, per_signal("")),
        (8, rates.iter().map(|r| r.to_string()).collect()),
        (32, per_signal("")),
    ];
    for (len, values) in &columns {
        for v in values {
            field(&mut out, v, *len);
        }
    }

    for r in 0..seconds {
        for (ch, &sfreq) in rates.iter().enumerate() {
            for k in 0..sfreq {
                let t = r * sfreq + k;
                let d = (signal(ch, t) * DIGITAL_PER_UV).round().clamp(-32768.0, 32767.0) as i16;
                out.extend_from_slice(&d.to_le_bytes());
            }
        }
    }
    std::fs::write(path, out).unwrap();
}

#[allow(unused)]
/// Alpha-band test signal: a 10 Hz sine of `amp_uv` microvolts, phase shifted per channel.
pub fn alpha_signal(amp_uv: f64, sfreq: usize) -> impl Fn(usize, usize) -> f64 {
    move |ch, t| amp_uv * (2.0 * PI * 10.0 * t as f64 / sfreq as f64 + ch as f64).sin()
}

#[allow(unused)]
pub fn labels(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}
