//! A simple example sizing a Bloom filter, then calibrating the size.
use bloomsize::{calc, BloomStore, Calibrator, SipHashFamily};

fn main() -> bloomsize::Result<()> {
    let family = SipHashFamily::new();
    let nbits = calc::optimize_size(1000, 0.01, &family)?;
    let mut bf = BloomStore::with_hasher(nbits, family)?;

    bf.insert("foo");
    bf.insert("bar");

    bf.contains("foo"); // true
    bf.contains("bar"); // true
    bf.contains("baz"); // false

    let mut calibrator = Calibrator::new();
    let calibration = calibrator.measure_synthetic(1000, 0.01)?;

    println!(
        "analytic: {} bits, calibrated: {} bits (rate {:.5}, {} trials)",
        nbits, calibration.nbits, calibration.probability, calibration.trials
    );
    Ok(())
}
