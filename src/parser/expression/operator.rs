#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOperator {
    Bang,
    Minus,
}

impl PrefixOperator {
    pub fn get_binding_power(&self) -> u8 {
        match self {
            // 2. Prefix operators
            PrefixOperator::Bang | PrefixOperator::Minus => 11,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            PrefixOperator::Bang => "!",
            PrefixOperator::Minus => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOperator {
    Multiply,
    Divide,
    Add,
    Subtract,
    LessThan,
    GreaterThan,
    EqualEqual,
    BangEqual,
}

impl InfixOperator {
    /// Left and right binding powers. The right side binds tighter so that operators of the
    /// same precedence associate to the left.
    pub fn get_binding_power(&self) -> (u8, u8) {
        match self {
            // 3. Multiplicative operators
            Self::Multiply | Self::Divide => (9, 10),
            // 4. Additive operators
            Self::Add | Self::Subtract => (7, 8),
            // 5. Comparison operators
            Self::LessThan | Self::GreaterThan => (5, 6),
            // 6. Equality operators
            Self::EqualEqual | Self::BangEqual => (3, 4),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOperator {
    Call,
    Index,
}

impl PostfixOperator {
    pub fn get_binding_power(&self) -> u8 {
        match self {
            // 1. Call and index operators
            Self::Call | Self::Index => 13,
        }
    }
}

impl std::fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl std::fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
