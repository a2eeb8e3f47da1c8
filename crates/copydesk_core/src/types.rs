use std::fmt;
use std::str::FromStr;

pub type JobId = String;
pub type ToastId = u64;

/// One phase of the external writing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Init,
    P1,
    P2,
    P3,
    P4,
    Done,
    Error,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Init => "preparing",
            Stage::P1 => "drafting (P1)",
            Stage::P2 => "template injection (P2)",
            Stage::P3 => "voice tuning (P3)",
            Stage::P4 => "evidence fusion (P4)",
            Stage::Done => "done",
            Stage::Error => "failed",
        }
    }
}

/// Coarse lifecycle of a submitted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobStatus {
    #[default]
    Pending,
    Running,
    Done,
    Error,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }

    pub fn label(self) -> &'static str {
        match self {
            JobStatus::Pending => "queued",
            JobStatus::Running => "running",
            JobStatus::Done => "done",
            JobStatus::Error => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Intent {
    Troubleshooting,
    Mythbusting,
    Mechanism,
    Howto,
    Conversion,
    Decision,
    Editorial,
    Mobilization,
}

impl Intent {
    pub const ALL: [Intent; 8] = [
        Intent::Troubleshooting,
        Intent::Mythbusting,
        Intent::Mechanism,
        Intent::Howto,
        Intent::Conversion,
        Intent::Decision,
        Intent::Editorial,
        Intent::Mobilization,
    ];

    /// Wire key sent to the pipeline service.
    pub fn key(self) -> &'static str {
        match self {
            Intent::Troubleshooting => "troubleshooting",
            Intent::Mythbusting => "mythbusting",
            Intent::Mechanism => "mechanism",
            Intent::Howto => "howto",
            Intent::Conversion => "conversion",
            Intent::Decision => "decision",
            Intent::Editorial => "editorial",
            Intent::Mobilization => "mobilization",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Intent::Troubleshooting => "Troubleshooting / fix a problem",
            Intent::Mythbusting => "Mythbusting / counter-intuitive take",
            Intent::Mechanism => "Mechanism / how it works",
            Intent::Howto => "How-to / tutorial",
            Intent::Conversion => "Conversion / recommend a solution",
            Intent::Decision => "Decision / compare options",
            Intent::Editorial => "Editorial / opinion piece",
            Intent::Mobilization => "Mobilization / call to action",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Intent::ALL
            .into_iter()
            .find(|intent| intent.key().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown intent `{needle}`"))
    }
}

/// Thematic viewpoint used to group generated title candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    Behavior,
    Emotion,
    Mechanism,
    Philosophy,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::Behavior,
        Quadrant::Emotion,
        Quadrant::Mechanism,
        Quadrant::Philosophy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Quadrant::Behavior => "Behavior",
            Quadrant::Emotion => "Emotion",
            Quadrant::Mechanism => "Mechanism",
            Quadrant::Philosophy => "Philosophy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuadrantTitles {
    pub behavior: Vec<String>,
    pub emotion: Vec<String>,
    pub mechanism: Vec<String>,
    pub philosophy: Vec<String>,
}

impl QuadrantTitles {
    pub fn get(&self, quadrant: Quadrant) -> &[String] {
        match quadrant {
            Quadrant::Behavior => &self.behavior,
            Quadrant::Emotion => &self.emotion,
            Quadrant::Mechanism => &self.mechanism,
            Quadrant::Philosophy => &self.philosophy,
        }
    }

    pub fn is_empty(&self) -> bool {
        Quadrant::ALL.iter().all(|q| self.get(*q).is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub description: Option<String>,
    pub voices: Vec<String>,
}

/// Server snapshot of a job's progress.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub job_id: JobId,
    pub stage: Stage,
    pub status: JobStatus,
    pub progress: Option<f64>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult {
    pub job_id: JobId,
    pub title: String,
    pub final_a: String,
    pub final_b: String,
    pub variants: Option<serde_json::Value>,
}

impl PipelineResult {
    pub fn content(&self, variant: Variant) -> &str {
        match variant {
            Variant::A => &self.final_a,
            Variant::B => &self.final_b,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    A,
    B,
}

impl Variant {
    pub fn letter(self) -> &'static str {
        match self {
            Variant::A => "A",
            Variant::B => "B",
        }
    }
}
