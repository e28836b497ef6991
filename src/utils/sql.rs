use sea_orm::sea_query::LikeExpr;

/// 转义 LIKE 查询中的通配符
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// 按字面值做包含匹配，通配符经转义并声明 ESCAPE '\'
pub fn contains_literal(input: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", escape_like_pattern(input))).escape('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern() {
        assert_eq!(escape_like_pattern("2023"), "2023");
        assert_eq!(escape_like_pattern("50%_x"), "50\\%\\_x");
    }
}
