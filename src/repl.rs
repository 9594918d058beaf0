// repl.rs
//
// Menu loop: one iteration reloads the history, runs a calculation or a
// history action, and persists the result. All prompts go through rustyline.

use std::path::Path;

use anyhow::Result;
use chrono::Local;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::warn;

use crate::calc::{self, Calculation, Mode};
use crate::history::{HistoryLog, HistoryRecord, HISTORY_FILE};

pub fn run() -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let path = Path::new(HISTORY_FILE);
    loop {
        let mut log = match HistoryLog::load(path) {
            Ok(log) => log,
            Err(err) => {
                warn!("history load failed: {err:#}");
                println!("Aviso: no se pudo leer el historial: {err:#}");
                HistoryLog::default()
            }
        };
        print_menu();
        let Some(choice) = read_line(&mut rl, "Ingrese el número de la opción: ") else {
            break;
        };
        let mode = match choice.trim() {
            "5" => {
                println!("Programa cerrado. ¡Hasta luego!");
                break;
            }
            "4" => {
                log.clear();
                persist(&log, path);
                println!("✅ Historial limpiado exitosamente. El archivo está vacío.");
                continue;
            }
            other => match select_mode(other) {
                Some(mode) => mode,
                None => {
                    println!("Opción inválida, intente de nuevo.");
                    continue;
                }
            },
        };

        let Some(amount) = prompt_number(&mut rl, "Ingrese el monto base: ", "El monto") else {
            break;
        };
        let Some(percent) = prompt_number(&mut rl, "Ingrese el porcentaje (%): ", "El porcentaje")
        else {
            break;
        };

        let result = calc::calculate(mode, amount, percent);
        match &result {
            Ok(calculation) => print_report(amount, percent, calculation),
            Err(err) => println!("Error: {err}"),
        }
        let record = HistoryRecord::from_result(mode, amount, percent, &result);
        log.push(record.render(Local::now()));
        persist(&log, path);

        let Some(answer) = read_line(&mut rl, "¿Desea consultar el historial de cálculos? (s/n): ")
        else {
            break;
        };
        if answer.trim().eq_ignore_ascii_case("s") {
            show_history(&log);
        }
    }
    Ok(())
}

fn print_menu() {
    println!("\nBienvenido a la Calculadora Financiera Universal");
    println!("Seleccione una opción:");
    println!("1. Descuento");
    println!("2. Impuesto");
    println!("3. Propina");
    println!("4. Limpiar historial");
    println!("5. Salir");
}

fn select_mode(choice: &str) -> Option<Mode> {
    match choice {
        "1" => Some(Mode::Discount),
        "2" => Some(Mode::Tax),
        "3" => Some(Mode::Tip),
        _ => None,
    }
}

/// Reads one line; `None` means Ctrl-C / Ctrl-D and the caller should exit.
fn read_line(rl: &mut DefaultEditor, prompt: &str) -> Option<String> {
    match rl.readline(prompt) {
        Ok(line) => {
            let _ = rl.add_history_entry(line.as_str());
            Some(line)
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => None,
        Err(err) => {
            warn!("readline failed: {err}");
            None
        }
    }
}

/// Explicit retry loop: keeps asking until the input parses as a number.
fn prompt_number(rl: &mut DefaultEditor, prompt: &str, what: &str) -> Option<f64> {
    loop {
        let line = read_line(rl, prompt)?;
        match line.trim().parse::<f64>() {
            Ok(value) => return Some(value),
            Err(_) => println!("Error: {what} debe ser un número. Intente de nuevo."),
        }
    }
}

fn print_report(amount: f64, percent: f64, calculation: &Calculation) {
    match *calculation {
        Calculation::Discount { final_price } => {
            println!("Precio base: {amount:.2}");
            println!("Descuento aplicado: {percent:.2}%");
            println!("Precio final después del descuento: {final_price:.2}");
        }
        Calculation::Tax {
            base,
            tax_amount,
            total,
        } => {
            println!("Base: {base:.2}");
            println!("Impuesto aplicado ({percent:.2}%): {tax_amount:.2}");
            println!("Total con impuesto: {total:.2}");
        }
        Calculation::Tip {
            bill,
            tip_amount,
            total,
        } => {
            println!("Cuenta: {bill:.2}");
            println!("Propina aplicada ({percent:.2}%): {tip_amount:.2}");
            println!("Total con propina: {total:.2}");
        }
    }
}

fn show_history(log: &HistoryLog) {
    if log.is_empty() {
        println!("\n--- Historial vacío, no hay cálculos guardados ---");
        return;
    }
    println!("\n--- Historial de cálculos (máx. 8) ---");
    for (idx, entry) in log.entries().iter().enumerate() {
        println!("{}. {}", idx + 1, entry);
    }
}

/// A failed save is reported but never kills the session.
fn persist(log: &HistoryLog, path: &Path) {
    if let Err(err) = log.save(path) {
        warn!("history save failed: {err:#}");
        println!("Aviso: no se pudo guardar el historial: {err:#}");
    }
}
