/// Rule identifiers, in the fixed evaluation order the evaluator runs them in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleId {
    Sys001,
    Kill001,
    Loss001,
    Loss002,
    Exec001,
    Exec002,
    Exp001,
    Exp002,
    Exp003,
}

impl RuleId {
    pub const fn as_str(self) -> &'static str {
        match self {
            RuleId::Sys001 => "SYS-001",
            RuleId::Kill001 => "KILL-001",
            RuleId::Loss001 => "LOSS-001",
            RuleId::Loss002 => "LOSS-002",
            RuleId::Exec001 => "EXEC-001",
            RuleId::Exec002 => "EXEC-002",
            RuleId::Exp001 => "EXP-001",
            RuleId::Exp002 => "EXP-002",
            RuleId::Exp003 => "EXP-003",
        }
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
