//! Plain-text rendering of a run report.

use std::fmt::Write;

use rollscope_core::{AlgorithmOutcome, Evaluation, RunReport};

const MEGABYTE: usize = 1024 * 1024;

pub fn render_report(report: &RunReport) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        render_outcome(&mut out, outcome);
    }
    out
}

fn render_outcome(out: &mut String, outcome: &AlgorithmOutcome) {
    let _ = writeln!(out, "{}:", outcome.name);
    match &outcome.result {
        Ok(eval) => render_evaluation(out, eval),
        Err(e) => {
            let _ = writeln!(out, "  Error: {e}");
        }
    }
}

fn render_evaluation(out: &mut String, eval: &Evaluation) {
    let amount = if eval.timing.bytes == MEGABYTE {
        "a megabyte".to_string()
    } else {
        format!("{} bytes", eval.timing.bytes)
    };
    let _ = writeln!(
        out,
        "  Elapsed time to roll/digest {amount} of random data: {:?}",
        eval.timing.elapsed
    );

    let _ = writeln!(out, "  Bits departing from 50% likelihood of being zero:");
    for d in &eval.bias.biased_bits {
        let _ = writeln!(out, "    Bit {} is zero {:.1}% of the time", d.bit, d.percent());
    }

    let _ = writeln!(out, "  Bit-pair correlations departing from 50% likelihood:");
    for p in &eval.bias.correlated_pairs {
        let _ = writeln!(
            out,
            "    Bit {} == bit {} {:.1}% of the time",
            p.bit_a,
            p.bit_b,
            p.percent()
        );
    }

    let _ = writeln!(
        out,
        "  On 1-bit input change, digest bits departing from 50% likelihood of change:"
    );
    for d in &eval.avalanche.deviant_bits {
        let _ = writeln!(out, "    Bit {} varied {:.1}% of the time", d.bit, d.percent());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollscope_core::{
        Error, EvalConfig, Evaluator, FnAlgorithm, Registry, Roller, Selection,
    };

    struct LastByte(u8);

    impl Roller for LastByte {
        fn roll(&mut self, byte: u8) {
            self.0 = byte;
        }

        fn digest(&self) -> u32 {
            self.0 as u32
        }
    }

    fn stub_report(names: &[&str]) -> RunReport {
        let registry = Registry::builder()
            .register(FnAlgorithm::custom("last", "", || Box::new(LastByte(0))))
            .build()
            .unwrap();
        let config = EvalConfig {
            sample_len: 2048,
            reference_len: 16,
            phase_timeout: None,
            ..EvalConfig::new(42)
        };
        Evaluator::new(registry, config)
            .run(&Selection::named(names.iter().copied()))
            .unwrap()
    }

    #[test]
    fn evaluation_sections_in_order() {
        let text = render_report(&stub_report(&["last"]));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "last:");
        assert!(lines[1].starts_with("  Elapsed time to roll/digest 2048 bytes of random data: "));
        assert_eq!(lines[2], "  Bits departing from 50% likelihood of being zero:");

        let pairs_header = lines
            .iter()
            .position(|l| *l == "  Bit-pair correlations departing from 50% likelihood:")
            .unwrap();
        let avalanche_header = lines
            .iter()
            .position(|l| l.starts_with("  On 1-bit input change"))
            .unwrap();
        assert!(2 < pairs_header && pairs_header < avalanche_header);

        // Bit 31 of a zero-extended byte is always zero.
        assert!(text.contains("    Bit 31 is zero 100.0% of the time\n"));
        assert!(text.contains("    Bit 30 == bit 31 100.0% of the time\n"));
        assert!(text.contains("    Bit 31 varied 0.0% of the time\n"));
    }

    #[test]
    fn unknown_algorithm_is_rendered_as_error() {
        let report = stub_report(&["doesnotexist"]);
        assert_eq!(
            render_report(&report),
            format!(
                "doesnotexist:\n  Error: {}\n",
                Error::UnknownAlgorithm("doesnotexist".into())
            )
        );
    }

    #[test]
    fn megabyte_wording_for_full_size_runs() {
        let mut report = stub_report(&["last"]);
        if let Ok(eval) = &mut report.outcomes[0].result {
            eval.timing.bytes = MEGABYTE;
        }
        assert!(render_report(&report).contains("roll/digest a megabyte of random data"));
    }
}
