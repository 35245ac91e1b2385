use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Phase of the simulated authenticity check for one upload attempt.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationState {
    #[default]
    Idle,
    Scanning,
    Analyzing,
    Verified,
    Rejected,
    Warning,
}

impl VerificationState {
    pub const ALL: [VerificationState; 6] = [
        VerificationState::Idle,
        VerificationState::Scanning,
        VerificationState::Analyzing,
        VerificationState::Verified,
        VerificationState::Rejected,
        VerificationState::Warning,
    ];

    /// Terminal states never transition on their own.
    pub fn is_terminal(&self) -> bool {
        self.terminal_status().is_some()
    }

    /// Scanning or analyzing.
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            VerificationState::Scanning | VerificationState::Analyzing
        )
    }

    pub fn terminal_status(&self) -> Option<TerminalStatus> {
        match self {
            VerificationState::Verified => Some(TerminalStatus::Verified),
            VerificationState::Rejected => Some(TerminalStatus::Rejected),
            VerificationState::Warning => Some(TerminalStatus::Warning),
            _ => None,
        }
    }
}

impl Display for VerificationState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            VerificationState::Idle => write!(f, "idle"),
            VerificationState::Scanning => write!(f, "scanning"),
            VerificationState::Analyzing => write!(f, "analyzing"),
            VerificationState::Verified => write!(f, "verified"),
            VerificationState::Rejected => write!(f, "rejected"),
            VerificationState::Warning => write!(f, "warning"),
        }
    }
}

impl FromStr for VerificationState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(VerificationState::Idle),
            "scanning" => Ok(VerificationState::Scanning),
            "analyzing" => Ok(VerificationState::Analyzing),
            "verified" => Ok(VerificationState::Verified),
            "rejected" => Ok(VerificationState::Rejected),
            "warning" => Ok(VerificationState::Warning),
            _ => Err(anyhow::anyhow!("Invalid verification state: {}", s)),
        }
    }
}

/// Final, non-transitioning outcome of a verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalStatus {
    Verified,
    Rejected,
    Warning,
}

impl From<TerminalStatus> for VerificationState {
    fn from(status: TerminalStatus) -> Self {
        match status {
            TerminalStatus::Verified => VerificationState::Verified,
            TerminalStatus::Rejected => VerificationState::Rejected,
            TerminalStatus::Warning => VerificationState::Warning,
        }
    }
}

impl Display for TerminalStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        VerificationState::from(*self).fmt(f)
    }
}

impl FromStr for TerminalStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<VerificationState>()?
            .terminal_status()
            .ok_or_else(|| anyhow::anyhow!("Not a terminal status: {}", s))
    }
}

/// One of the three steps listed under the upload preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStep {
    Scanning = 1,
    Analysis = 2,
    Result = 3,
}

impl VerificationStep {
    pub const ALL: [VerificationStep; 3] = [
        VerificationStep::Scanning,
        VerificationStep::Analysis,
        VerificationStep::Result,
    ];

    pub fn index(&self) -> u8 {
        *self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(VerificationStep::Scanning),
            2 => Some(VerificationStep::Analysis),
            3 => Some(VerificationStep::Result),
            _ => None,
        }
    }
}

/// Visual status of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Active,
    Complete,
    Error,
    Warning,
}

impl Display for StepStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.pad(match self {
            StepStatus::Pending => "pending",
            StepStatus::Active => "active",
            StepStatus::Complete => "complete",
            StepStatus::Error => "error",
            StepStatus::Warning => "warning",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_names_parse_back() {
        for state in VerificationState::ALL {
            assert_eq!(state.to_string().parse::<VerificationState>().unwrap(), state);
        }
        assert!("done".parse::<VerificationState>().is_err());
    }

    #[test]
    fn only_outcomes_are_terminal() {
        assert!(!VerificationState::Idle.is_terminal());
        assert!(!VerificationState::Scanning.is_terminal());
        assert!(VerificationState::Analyzing.is_in_progress());
        assert!(VerificationState::Rejected.is_terminal());
        assert!("scanning".parse::<TerminalStatus>().is_err());
        assert_eq!(
            "warning".parse::<TerminalStatus>().unwrap(),
            TerminalStatus::Warning
        );
    }

    #[test]
    fn step_status_honours_width() {
        assert_eq!(format!("{:<9}|", StepStatus::Active), "active   |");
        assert_eq!(format!("{:<9}|", StepStatus::Complete), "complete |");
        assert_eq!(StepStatus::Error.to_string(), "error");
    }

    #[test]
    fn step_indices_are_one_based() {
        assert_eq!(VerificationStep::Scanning.index(), 1);
        assert_eq!(VerificationStep::from_index(3), Some(VerificationStep::Result));
        assert_eq!(VerificationStep::from_index(0), None);
        assert_eq!(VerificationStep::from_index(4), None);
    }

    #[test]
    fn serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&VerificationState::Analyzing).unwrap(),
            "\"analyzing\""
        );
        assert_eq!(serde_json::to_string(&StepStatus::Error).unwrap(), "\"error\"");
    }
}
