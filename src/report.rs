//! Human-readable summary of an evaluation batch.

use std::fmt::Write;

use crate::constants::REPORT_SAMPLE_LIMIT;
use crate::results::Evaluation;

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

fn write_examples(out: &mut String, samples: &[String], title: &str, empty: &str) {
    // Examples are listed only once there are more than the limit.
    if samples.len() > REPORT_SAMPLE_LIMIT {
        let _ = writeln!(out, "\n{}", title);
        for s in &samples[..REPORT_SAMPLE_LIMIT] {
            let _ = writeln!(out, "{}", s);
        }
    } else {
        let _ = writeln!(out, "\n{}", empty);
    }
}

/// Render the fixed-format summary for `eval`.
pub fn render_summary(eval: &Evaluation) -> String {
    let results = &eval.results;
    let total = results.n_samples;
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "~~~ Summary Results ~~~");
    let _ = writeln!(out, "{:<15} : {:>6}", "Total samples", total);
    let _ = writeln!(
        out,
        "{:<15} : {:>6} ({:2.2}%)",
        "Unique",
        results.uniq_samples,
        percent(results.uniq_samples, total)
    );
    let _ = writeln!(
        out,
        "{:<15} : {:>6} ({:2.2}%)",
        "Unverified",
        results.bad_samples,
        percent(results.bad_samples, total)
    );
    let _ = writeln!(
        out,
        "{:<15} : {:>6} ({:2.2}%)",
        "Verified",
        results.good_samples,
        percent(results.good_samples, total)
    );

    write_examples(
        &mut out,
        &eval.verified,
        "Example of good samples:",
        "no good samples found :(",
    );
    write_examples(
        &mut out,
        &eval.unverified,
        "Example of bad samples:",
        "no bad samples found :(",
    );

    let _ = writeln!(out, "~~~~~~~~~~~~~~~~~~~~~~~");
    out
}

/// Print the summary for `eval` to stdout.
pub fn print_results(eval: &Evaluation) {
    print!("{}", render_summary(eval));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::EvalResults;

    fn evaluation(verified: &[&str], unverified: &[&str], uniq: usize) -> Evaluation {
        let verified: Vec<String> = verified.iter().map(|s| s.to_string()).collect();
        let unverified: Vec<String> = unverified.iter().map(|s| s.to_string()).collect();
        Evaluation {
            results: EvalResults {
                n_samples: verified.len() + unverified.len(),
                uniq_samples: uniq,
                good_samples: verified.len(),
                bad_samples: unverified.len(),
                ..EvalResults::default()
            },
            verified,
            unverified,
        }
    }

    #[test]
    fn test_render_header_lines() {
        let eval = evaluation(&["CCO", "CCN", "CCO"], &["C("], 3);
        let text = render_summary(&eval);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "~~~ Summary Results ~~~");
        assert_eq!(lines[1], "Total samples   :      4");
        assert_eq!(lines[2], "Unique          :      3 (75.00%)");
        assert_eq!(lines[3], "Unverified      :      1 (25.00%)");
        assert_eq!(lines[4], "Verified        :      3 (75.00%)");
        assert_eq!(*lines.last().unwrap(), "~~~~~~~~~~~~~~~~~~~~~~~");
    }

    #[test]
    fn test_render_small_partitions_show_not_found() {
        let eval = evaluation(&["CCO", "CCN", "CCC", "CCS", "CCF"], &[], 5);
        let text = render_summary(&eval);

        assert!(text.contains("\nno good samples found :(\n"));
        assert!(text.contains("\nno bad samples found :(\n"));
        assert!(!text.contains("Example of good samples:"));
    }

    #[test]
    fn test_render_exactly_limit_shows_not_found() {
        let good: Vec<&str> = std::iter::repeat("CC").take(10).collect();
        let text = render_summary(&evaluation(&good, &[], 1));
        assert!(text.contains("no good samples found :("));
    }

    #[test]
    fn test_render_large_partition_lists_ten() {
        let good: Vec<String> = (0..12).map(|i| format!("C{}", "C".repeat(i))).collect();
        let good: Vec<&str> = good.iter().map(|s| s.as_str()).collect();
        let text = render_summary(&evaluation(&good, &[], 12));

        assert!(text.contains("\nExample of good samples:\n"));
        let listed: Vec<&str> = text
            .lines()
            .skip_while(|l| *l != "Example of good samples:")
            .skip(1)
            .take_while(|l| !l.is_empty())
            .collect();
        assert_eq!(listed, good[..10].to_vec());
        assert!(!text.contains(good[10]));
        assert!(text.contains("no bad samples found :("));
    }

    #[test]
    fn test_render_empty_batch() {
        let text = render_summary(&evaluation(&[], &[], 0));
        assert!(text.contains("Total samples   :      0"));
        assert!(text.contains("Unique          :      0 (0.00%)"));
        assert!(text.contains("Verified        :      0 (0.00%)"));
    }
}
