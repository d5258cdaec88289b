use anyhow::{anyhow, bail, ensure, Result};
use core::fmt;
use logos::{Lexer, Logos};
use std::{ops::Sub, str::FromStr};

/// A point on the simulation clock, in seconds since the run started.
///
/// The simulation's native unit is the floating-point second; every event
/// timestamp, warm-up boundary and derived duration (latency, buffer
/// residence, round-trip time) is expressed in it.
///
/// # Parsing and display
///
/// Human-entered values (warm-up lengths, scenario end times) parse from
/// unit-suffixed components which are summed together:
///
/// ```
/// use dtnstat_core::SimTime;
///
/// let warm_up: SimTime = "1s 500ms".parse().unwrap();
/// assert_eq!(warm_up.seconds(), 1.5);
/// assert_eq!(warm_up.to_string(), "1.5000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct SimTime(f64);

impl SimTime {
    /// The start of the run.
    pub const ZERO: Self = Self(0.0);

    /// Creates a clock value from raw seconds.
    pub const fn from_seconds(seconds: f64) -> Self {
        Self(seconds)
    }

    /// Returns the raw seconds value.
    pub const fn seconds(self) -> f64 {
        self.0
    }
}

/// Elapsed seconds between two clock values (`later - earlier`).
///
/// The difference is the unit the statistics series are stored in, so the
/// subtraction yields a plain `f64` rather than another [`SimTime`].
impl Sub for SimTime {
    type Output = f64;

    fn sub(self, earlier: Self) -> f64 {
        self.0 - earlier.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 4-decimal rendering, the convention downstream report consumers expect
        write!(f, "{:.4}", self.0)
    }
}

impl FromStr for SimTime {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lex = Lexer::new(s);

        let mut total = 0.0_f64;
        let mut components = 0usize;

        while let Some(next) = lex.next() {
            let number: Token = next.map_err(|()| anyhow!("Failed to parse: {s}"))?;

            ensure!(
                number == Token::Value,
                "Expecting time to start with a number. Cannot parse {s}"
            );
            let number: f64 = lex.slice().parse()?;

            let Some(Ok(measure)) = lex.next() else {
                bail!("Expecting a measure, failed to parse: {s}")
            };
            // divisions by exact powers of ten keep the conversion correctly rounded
            let seconds = match measure {
                Token::NanoSeconds => number / 1e9,
                Token::MicroSeconds => number / 1e6,
                Token::MilliSeconds => number / 1e3,
                Token::Seconds => number,
                Token::Minutes => number * 60.0,
                Token::Value => bail!("Failed to parse `{s}', expecting a measure."),
            };
            total += seconds;
            components += 1;
        }

        ensure!(components > 0, "Cannot parse an empty time: {s}");

        Ok(Self(total))
    }
}

#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t\n\f]+")] // Ignore this regex pattern between tokens
enum Token {
    #[token("ns")]
    NanoSeconds,
    #[regex("us|μs")]
    MicroSeconds,
    #[token("ms")]
    MilliSeconds,
    #[token("s")]
    Seconds,
    #[token("m")]
    Minutes,

    #[regex("[0-9]+")]
    Value,
}
