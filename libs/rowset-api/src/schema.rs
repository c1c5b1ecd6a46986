use crate::error::SchemaError;

// ════════════════════════════════════════════════════════════════
//  Declared Type
// ════════════════════════════════════════════════════════════════

/// Type tag a column declares in the result schema.
///
/// Only the tags the decoder dispatches on are modelled; everything else
/// (arrays, tuples, variants, ...) is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    /// Fixed precision, e.g. `Decimal(18, 2)`.
    Decimal { precision: u8, scale: u8 },
    String,
    Binary,
    /// Calendar date, `YYYY-MM-DD` on the wire.
    Date,
    /// Time of day, `HH:MM:SS[.fraction]` on the wire.
    Time,
    /// `YYYY-MM-DD HH:MM:SS[.fraction]` on the wire.
    Timestamp,
    Other(String),
}

impl DeclaredType {
    /// Parse a wire type name. Returns the type and whether it was wrapped
    /// in `Nullable(...)`.
    pub fn parse(text: &str) -> Result<(Self, bool), &'static str> {
        let text = text.trim();
        if text.is_empty() {
            return Err("empty type name");
        }
        check_balanced(text)?;

        let (head, args) = match text.find('(') {
            Some(open) => {
                if !text.ends_with(')') {
                    return Err("trailing characters after ')'");
                }
                (text[..open].trim(), Some(&text[open + 1..text.len() - 1]))
            }
            None => (text, None),
        };
        if head.is_empty() {
            return Err("empty type name");
        }

        let lower = head.to_ascii_lowercase();
        if lower == "nullable" {
            let inner = args.ok_or("Nullable requires an argument")?;
            let (inner, _) = Self::parse(inner)?;
            return Ok((inner, true));
        }
        if lower == "decimal" || lower == "numeric" {
            return match args {
                Some(args) => parse_decimal_args(args).map(|t| (t, false)),
                None => Ok((DeclaredType::Decimal { precision: 38, scale: 0 }, false)),
            };
        }
        if args.is_some() {
            return Ok((DeclaredType::Other(text.to_string()), false));
        }

        let ty = match lower.as_str() {
            "boolean" | "bool" => DeclaredType::Boolean,
            "int8" | "tinyint" => DeclaredType::Int8,
            "int16" | "smallint" => DeclaredType::Int16,
            "int32" | "int" | "integer" => DeclaredType::Int32,
            "int64" | "bigint" => DeclaredType::Int64,
            "uint8" => DeclaredType::UInt8,
            "uint16" => DeclaredType::UInt16,
            "uint32" => DeclaredType::UInt32,
            "uint64" => DeclaredType::UInt64,
            "float32" | "float" => DeclaredType::Float32,
            "float64" | "double" => DeclaredType::Float64,
            "string" | "varchar" | "text" => DeclaredType::String,
            "binary" | "varbinary" => DeclaredType::Binary,
            "date" => DeclaredType::Date,
            "time" => DeclaredType::Time,
            "timestamp" | "datetime" => DeclaredType::Timestamp,
            _ => DeclaredType::Other(text.to_string()),
        };
        Ok((ty, false))
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DeclaredType::Int8
                | DeclaredType::Int16
                | DeclaredType::Int32
                | DeclaredType::Int64
                | DeclaredType::UInt8
                | DeclaredType::UInt16
                | DeclaredType::UInt32
                | DeclaredType::UInt64
        )
    }
}

fn check_balanced(text: &str) -> Result<(), &'static str> {
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1).ok_or("unbalanced parentheses")?,
            _ => {}
        }
    }
    if depth == 0 { Ok(()) } else { Err("unbalanced parentheses") }
}

fn parse_decimal_args(args: &str) -> Result<DeclaredType, &'static str> {
    let mut parts = args.split(',').map(str::trim);
    let precision: u8 = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or("Decimal precision must be an integer")?;
    let scale: u8 = match parts.next() {
        Some(s) => s.parse().map_err(|_| "Decimal scale must be an integer")?,
        None => 0,
    };
    if parts.next().is_some() {
        return Err("Decimal takes at most two arguments");
    }
    if precision == 0 || scale > precision {
        return Err("Decimal scale must not exceed precision");
    }
    Ok(DeclaredType::Decimal { precision, scale })
}

impl std::fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclaredType::Boolean => write!(f, "Boolean"),
            DeclaredType::Int8 => write!(f, "Int8"),
            DeclaredType::Int16 => write!(f, "Int16"),
            DeclaredType::Int32 => write!(f, "Int32"),
            DeclaredType::Int64 => write!(f, "Int64"),
            DeclaredType::UInt8 => write!(f, "UInt8"),
            DeclaredType::UInt16 => write!(f, "UInt16"),
            DeclaredType::UInt32 => write!(f, "UInt32"),
            DeclaredType::UInt64 => write!(f, "UInt64"),
            DeclaredType::Float32 => write!(f, "Float32"),
            DeclaredType::Float64 => write!(f, "Float64"),
            DeclaredType::Decimal { precision, scale } => {
                write!(f, "Decimal({precision}, {scale})")
            }
            DeclaredType::String => write!(f, "String"),
            DeclaredType::Binary => write!(f, "Binary"),
            DeclaredType::Date => write!(f, "Date"),
            DeclaredType::Time => write!(f, "Time"),
            DeclaredType::Timestamp => write!(f, "Timestamp"),
            DeclaredType::Other(name) => f.write_str(name),
        }
    }
}

// ════════════════════════════════════════════════════════════════
//  Column Descriptor
// ════════════════════════════════════════════════════════════════

/// One column of a result schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Type text exactly as the server sent it, e.g. `Nullable(Decimal(10, 2))`.
    pub type_name: String,
    pub declared_type: DeclaredType,
    pub nullable: bool,
}

impl ColumnDescriptor {
    /// Build a descriptor from the wire `(name, type)` pair. `ordinal` is
    /// 1-based and only used for error reporting.
    pub fn parse(ordinal: usize, name: &str, type_name: &str) -> Result<Self, SchemaError> {
        if name.is_empty() {
            return Err(SchemaError::EmptyName { ordinal });
        }
        let (declared_type, nullable) =
            DeclaredType::parse(type_name).map_err(|reason| SchemaError::MalformedType {
                column: name.to_string(),
                type_text: type_name.to_string(),
                reason,
            })?;
        Ok(Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            declared_type,
            nullable,
        })
    }
}
