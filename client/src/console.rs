use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;

const NUMBER_ERROR: &str = "Number could not be read. Try again.";
const WORD_ERROR: &str = "String can not have spaces. Try again.";

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("input closed before a value could be read")]
    Closed,

    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("incorrect option {choice}: expected a number between 1 and {max}")]
    InvalidOption { choice: i32, max: usize },
}

/// Entrada/salida del diálogo con el usuario, por líneas.
///
/// Los errores de formato se reportan en la salida y se vuelve a leer; si la
/// entrada se termina es un error fatal.
pub struct Console<R, W> {
    input: R,
    output: W,
}

pub type StdConsole = Console<io::StdinLock<'static>, io::Stdout>;

impl StdConsole {
    pub fn stdio() -> Self {
        Console::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn print(&mut self, text: &str) -> Result<(), ConsoleError> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        Ok(())
    }

    pub fn println(&mut self, text: &str) -> Result<(), ConsoleError> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    pub fn newline(&mut self) -> Result<(), ConsoleError> {
        self.println("")
    }

    fn read_line(&mut self) -> Result<String, ConsoleError> {
        self.output.flush()?;
        // bytes inválidos quedan como U+FFFD y fallan el parseo, no la lectura
        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            return Err(ConsoleError::Closed);
        }
        let line = String::from_utf8_lossy(&raw);
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }

    fn read_number<T: FromStr>(&mut self) -> Result<T, ConsoleError> {
        loop {
            let line = self.read_line()?;
            match line.trim().parse::<T>() {
                Ok(n) => return Ok(n),
                Err(_) => self.println(NUMBER_ERROR)?,
            }
        }
    }

    pub fn read_integer(&mut self) -> Result<i32, ConsoleError> {
        self.read_number()
    }

    pub fn read_decimal(&mut self) -> Result<f64, ConsoleError> {
        self.read_number()
    }

    /// Una sola palabra: se rechazan líneas vacías, con espacios en el medio o
    /// con bytes que no son UTF-8.
    pub fn read_word(&mut self) -> Result<String, ConsoleError> {
        loop {
            let line = self.read_line()?;
            let word = line.trim();
            if word.is_empty()
                || word.contains(char::is_whitespace)
                || word.contains(char::REPLACEMENT_CHARACTER)
            {
                self.println(WORD_ERROR)?;
            } else {
                return Ok(word.to_string());
            }
        }
    }

    /// Imprime `title`, las opciones numeradas desde 1 (`per_line` por línea)
    /// y devuelve la elegida. Una opción fuera de rango es fatal.
    pub fn select_option<'o>(
        &mut self,
        title: &str,
        options: &'o [String],
        per_line: usize,
    ) -> Result<&'o str, ConsoleError> {
        self.println(title)?;
        let per_line = per_line.max(1);
        for (i, option) in options.iter().enumerate() {
            self.print(&format!("\t{}. {}", i + 1, option))?;
            if i % per_line == per_line - 1 {
                self.newline()?;
            }
        }
        // cierra la última fila; si ya estaba completa queda una línea en blanco
        self.newline()?;
        self.println("Insert number option:")?;
        let choice = self.read_integer()?;

        usize::try_from(choice)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| options.get(idx))
            .map(String::as_str)
            .ok_or(ConsoleError::InvalidOption {
                choice,
                max: options.len(),
            })
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}
