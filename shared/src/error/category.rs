//! Error domains derived from the code's leading digit

use super::codes::ErrorCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    General,
    Auth,
    Permission,
    Restaurant,
    Schedule,
    Storage,
    Menu,
    Order,
    /// 8xxx and up; logged server-side when returned
    System,
}

impl ErrorCategory {
    pub fn from_code(code: u16) -> Self {
        match code / 1000 {
            0 => Self::General,
            1 => Self::Auth,
            2 => Self::Permission,
            3 => Self::Restaurant,
            4 => Self::Schedule,
            5 => Self::Storage,
            6 => Self::Menu,
            7 => Self::Order,
            _ => Self::System,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Restaurant => "restaurant",
            Self::Schedule => "schedule",
            Self::Storage => "storage",
            Self::Menu => "menu",
            Self::Order => "order",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_digit_selects_domain() {
        assert_eq!(ErrorCategory::from_code(7), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1004), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(2013), ErrorCategory::Permission);
        assert_eq!(ErrorCategory::from_code(4002), ErrorCategory::Schedule);
        assert_eq!(ErrorCategory::from_code(6003), ErrorCategory::Menu);
        assert_eq!(ErrorCategory::from_code(7001), ErrorCategory::Order);
        assert_eq!(ErrorCategory::from_code(9002), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(u16::MAX), ErrorCategory::System);
    }

    #[test]
    fn codes_report_their_domain() {
        assert_eq!(ErrorCode::LegalDocsIncomplete.category(), ErrorCategory::Restaurant);
        assert_eq!(ErrorCode::FileTooLarge.category(), ErrorCategory::Storage);
        assert_eq!(ErrorCode::DatabaseError.category().to_string(), "system");
    }
}
