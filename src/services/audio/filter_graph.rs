//! Typed ffmpeg filter graph for the voice-over-music ducking mix
//!
//! Input `0:a` is the background track, `1:a` is the voice. The background is
//! only attenuated. The voice is amplified, delayed on both channels and padded
//! with trailing silence, so the music intro plays about a second before the
//! voice and keeps going for a few seconds after it. `amix` halves the level
//! of two equally weighted inputs, which the final volume stage compensates.

use std::fmt;

/// Fixed ducking parameters. Not tunable per request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterGraphSpec {
    pub background_gain: f32,
    pub voice_gain: f32,
    pub voice_delay_ms: u32,
    pub trailing_pad_secs: u32,
    pub dropout_transition_secs: u32,
    pub output_gain: f32,
}

pub const DUCKING: FilterGraphSpec = FilterGraphSpec {
    background_gain: 0.2,
    voice_gain: 1.5,
    voice_delay_ms: 1000,
    trailing_pad_secs: 6,
    dropout_transition_secs: 2,
    output_gain: 2.0,
};

impl Default for FilterGraphSpec {
    fn default() -> Self {
        DUCKING
    }
}

impl FilterGraphSpec {
    pub fn graph(&self) -> FilterGraph {
        FilterGraph {
            chains: vec![
                FilterChain::new(&["0:a"], vec![Filter::Volume(self.background_gain)], Some("bg")),
                FilterChain::new(
                    &["1:a"],
                    vec![
                        Filter::Volume(self.voice_gain),
                        Filter::Delay {
                            millis: self.voice_delay_ms,
                            channels: 2,
                        },
                        Filter::Pad {
                            secs: self.trailing_pad_secs,
                        },
                    ],
                    Some("v"),
                ),
                FilterChain::new(
                    &["bg", "v"],
                    vec![Filter::Mix {
                        inputs: 2,
                        duration: MixDuration::Shortest,
                        dropout_transition_secs: self.dropout_transition_secs,
                    }],
                    Some("mixed"),
                ),
                FilterChain::new(&["mixed"], vec![Filter::Volume(self.output_gain)], None),
            ],
        }
    }

    /// The `-filter_complex` argument.
    pub fn to_expression(&self) -> String {
        self.graph().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixDuration {
    Longest,
    Shortest,
    First,
}

impl MixDuration {
    fn as_str(&self) -> &'static str {
        match self {
            MixDuration::Longest => "longest",
            MixDuration::Shortest => "shortest",
            MixDuration::First => "first",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Volume(f32),
    /// Same delay applied to each of `channels` channels
    Delay { millis: u32, channels: usize },
    Pad { secs: u32 },
    Mix {
        inputs: u32,
        duration: MixDuration,
        dropout_transition_secs: u32,
    },
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Debug keeps the trailing ".0" on whole gains (2.0, not 2)
            Filter::Volume(gain) => write!(f, "volume={:?}", gain),
            Filter::Delay { millis, channels } => {
                let per_channel = vec![millis.to_string(); *channels];
                write!(f, "adelay={}", per_channel.join("|"))
            }
            Filter::Pad { secs } => write!(f, "apad=pad_dur={}", secs),
            Filter::Mix {
                inputs,
                duration,
                dropout_transition_secs,
            } => write!(
                f,
                "amix=inputs={}:duration={}:dropout_transition={}",
                inputs,
                duration.as_str(),
                dropout_transition_secs
            ),
        }
    }
}

/// `[in]...filter,filter,...[out]`
#[derive(Debug, Clone, PartialEq)]
pub struct FilterChain {
    pub inputs: Vec<String>,
    pub filters: Vec<Filter>,
    pub output: Option<String>,
}

impl FilterChain {
    fn new(inputs: &[&str], filters: Vec<Filter>, output: Option<&str>) -> Self {
        Self {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            filters,
            output: output.map(str::to_string),
        }
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for label in &self.inputs {
            write!(f, "[{}]", label)?;
        }
        let filters: Vec<String> = self.filters.iter().map(Filter::to_string).collect();
        write!(f, "{}", filters.join(","))?;
        if let Some(label) = &self.output {
            write!(f, "[{}]", label)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterGraph {
    pub chains: Vec<FilterChain>,
}

impl fmt::Display for FilterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chains: Vec<String> = self.chains.iter().map(FilterChain::to_string).collect();
        write!(f, "{}", chains.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED: &str = "[0:a]volume=0.2[bg]; [1:a]volume=1.5,adelay=1000|1000,apad=pad_dur=6[v]; [bg][v]amix=inputs=2:duration=shortest:dropout_transition=2[mixed]; [mixed]volume=2.0";

    #[test]
    fn ducking_expression_is_byte_identical() {
        assert_eq!(DUCKING.to_expression(), EXPECTED);
        assert_eq!(FilterGraphSpec::default().to_expression(), EXPECTED);
    }

    #[test]
    fn voice_chain_order_is_gain_delay_pad() {
        let graph = DUCKING.graph();
        let voice = &graph.chains[1];
        assert_eq!(voice.inputs, vec!["1:a".to_string()]);
        assert!(matches!(voice.filters[0], Filter::Volume(_)));
        assert!(matches!(voice.filters[1], Filter::Delay { .. }));
        assert!(matches!(voice.filters[2], Filter::Pad { .. }));
    }

    #[test]
    fn background_chain_is_gain_only() {
        let graph = DUCKING.graph();
        assert_eq!(graph.chains[0].filters, vec![Filter::Volume(0.2)]);
        assert_eq!(graph.chains[0].inputs, vec!["0:a".to_string()]);
    }

    #[test]
    fn final_chain_has_no_output_label() {
        let graph = DUCKING.graph();
        let last = graph.chains.last().unwrap();
        assert!(last.output.is_none());
        assert_eq!(last.to_string(), "[mixed]volume=2.0");
    }

    #[test]
    fn filter_rendering() {
        assert_eq!(Filter::Volume(1.0).to_string(), "volume=1.0");
        assert_eq!(
            Filter::Delay {
                millis: 250,
                channels: 1
            }
            .to_string(),
            "adelay=250"
        );
        assert_eq!(
            Filter::Mix {
                inputs: 3,
                duration: MixDuration::Longest,
                dropout_transition_secs: 0
            }
            .to_string(),
            "amix=inputs=3:duration=longest:dropout_transition=0"
        );
    }
}
