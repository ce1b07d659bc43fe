//! Reentrancy rules: which calls are legal in which dispatch phase.
//!
//! | call            | idle | entry | run (Reject) | run (Permit) | exit |
//! |-----------------|------|-------|--------------|--------------|------|
//! | `set_state`     | yes  | yes   | no           | yes          | no   |
//! | `set_terminate` | yes  | yes   | no           | yes          | yes  |
//! | `set_handled`   | yes  | yes   | yes          | yes          | yes  |

use crate::core::Phase;
use crate::enforcement::config::RunPhasePolicy;
use crate::enforcement::violations::Violation;

/// Check a `set_state` call made in `phase`.
pub fn check_transition(phase: Phase, policy: RunPhasePolicy) -> Result<(), Violation> {
    match (phase, policy) {
        (Phase::Exit, _) => Err(Violation::TransitionFromExit),
        (Phase::Run, RunPhasePolicy::Reject) => Err(Violation::TransitionFromRun),
        _ => Ok(()),
    }
}

/// Check a `set_terminate` call made in `phase`.
pub fn check_termination(phase: Phase, policy: RunPhasePolicy) -> Result<(), Violation> {
    match (phase, policy) {
        (Phase::Run, RunPhasePolicy::Reject) => Err(Violation::TerminateFromRun),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_PHASES: [Phase; 4] = [Phase::Idle, Phase::Entry, Phase::Run, Phase::Exit];

    #[test]
    fn transition_is_rejected_from_exit_under_any_policy() {
        for policy in [RunPhasePolicy::Reject, RunPhasePolicy::Permit] {
            assert_eq!(
                check_transition(Phase::Exit, policy),
                Err(Violation::TransitionFromExit)
            );
        }
    }

    #[test]
    fn transition_from_run_follows_policy() {
        assert_eq!(
            check_transition(Phase::Run, RunPhasePolicy::Reject),
            Err(Violation::TransitionFromRun)
        );
        assert_eq!(check_transition(Phase::Run, RunPhasePolicy::Permit), Ok(()));
    }

    #[test]
    fn transition_is_legal_from_entry_and_idle() {
        for phase in [Phase::Idle, Phase::Entry] {
            assert_eq!(check_transition(phase, RunPhasePolicy::Reject), Ok(()));
        }
    }

    #[test]
    fn termination_is_only_rejected_from_run() {
        for phase in ALL_PHASES {
            let expected = if phase == Phase::Run {
                Err(Violation::TerminateFromRun)
            } else {
                Ok(())
            };
            assert_eq!(check_termination(phase, RunPhasePolicy::Reject), expected);
            assert_eq!(check_termination(phase, RunPhasePolicy::Permit), Ok(()));
        }
    }
}
