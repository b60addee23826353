//! Formato de valores para las tablas (moneda BRL, CNPJ, fechas)

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::validation::strip_non_digits;

/// Formatear un importe como moneda brasileña: `R$ 1.234,56`
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (integer, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    if negative {
        format!("-R$ {},{}", grouped, cents)
    } else {
        format!("R$ {},{}", grouped, cents)
    }
}

/// Aplicar la máscara `NN.NNN.NNN/NNNN-NN`; valores que no tienen 14 dígitos se devuelven tal cual
pub fn format_cnpj(value: &str) -> String {
    let digits = strip_non_digits(value);
    if digits.len() != 14 {
        return value.to_string();
    }
    format!(
        "{}.{}.{}/{}-{}",
        &digits[0..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..12],
        &digits[12..14]
    )
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Tabla de texto con columnas alineadas (sin filas muestra un aviso)
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = vec![pad_line(headers, &widths)];
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    if rows.is_empty() {
        out.push("Nenhum registro encontrado".to_string());
    }
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push(pad_line(&cells, &widths));
    }
    out.join("\n")
}

fn pad_line(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let padding = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Decimal::new(120000, 2)), "R$ 1.200,00");
        assert_eq!(format_currency(Decimal::new(5, 1)), "R$ 0,50");
        assert_eq!(format_currency(Decimal::new(123456789, 2)), "R$ 1.234.567,89");
        assert_eq!(format_currency(Decimal::new(-9999, 2)), "-R$ 99,99");
    }

    #[test]
    fn test_format_cnpj() {
        assert_eq!(format_cnpj("12345678000190"), "12.345.678/0001-90");
        assert_eq!(format_cnpj("12.345.678/0001-90"), "12.345.678/0001-90");
        assert_eq!(format_cnpj("123"), "123");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(format_date(date), "09/03/2024");
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let rows = vec![
            vec!["ABC-1234".to_string(), "VAN".to_string(), "Rápido Sul".to_string()],
            vec!["XYZ9876".to_string(), "TRUCK".to_string(), "-".to_string()],
        ];
        let table = render_table(&["Placa", "Tipo", "Transportadora"], &rows);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "Placa    | Tipo  | Transportadora");
        assert_eq!(lines[1], "---------+-------+---------------");
        assert_eq!(lines[2], "ABC-1234 | VAN   | Rápido Sul");
        assert_eq!(lines[3], "XYZ9876  | TRUCK | -");
    }

    #[test]
    fn test_render_empty_table() {
        let table = render_table(&["Nome"], &[]);
        assert!(table.ends_with("Nenhum registro encontrado"));
    }
}
