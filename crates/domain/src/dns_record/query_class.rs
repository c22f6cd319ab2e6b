use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueryClass {
    #[default]
    Internet,
    Chaos,
}

impl QueryClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryClass::Internet => "IN",
            QueryClass::Chaos => "CH",
        }
    }

    pub fn to_u16(&self) -> u16 {
        match self {
            QueryClass::Internet => 1,
            QueryClass::Chaos => 3,
        }
    }

    pub fn from_chaos_flag(chaos: bool) -> Self {
        if chaos {
            QueryClass::Chaos
        } else {
            QueryClass::Internet
        }
    }
}

impl fmt::Display for QueryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
