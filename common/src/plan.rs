use thiserror::Error;

use crate::layout::{Corpus, RunLayout};
use crate::params::{RunParameters, YearWindow};
use crate::scripts::HiveScript;
use crate::step::{ScriptParam, Step};

/// EMR acepta hasta 256 steps por job, por eso los nombres llevan 3 dígitos.
pub const MAX_STEPS: usize = 256;

/// Acepta solo palabras en minúscula, sueltas o dos unidas por guión.
/// Va escapado para sobrevivir la sustitución de variables de Hive.
pub const GRAM_REGEX: &str = r"^\\\p{Ll}+(\\\-)?\\\p{Ll}+$";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("the job would have {count} steps, but the cluster accepts at most {max}")]
    TooManySteps { count: usize, max: usize },
}

/// Arma la lista ordenada de steps de un job.
///
/// Los nombres ("Step-001", "Step-002", ...) salen de un contador propio del
/// builder, así que son crecientes sin importar qué método agregó el step.
#[derive(Debug)]
pub struct StepSequenceBuilder<'a> {
    layout: &'a RunLayout,
    next_step: usize,
    steps: Vec<Step>,
}

impl<'a> StepSequenceBuilder<'a> {
    pub fn new(layout: &'a RunLayout) -> Self {
        Self {
            layout,
            next_step: 1,
            steps: Vec::new(),
        }
    }

    fn next_name(&mut self) -> String {
        let name = format!("Step-{:03}", self.next_step);
        self.next_step += 1;
        name
    }

    fn push(&mut self, script: HiveScript, params: Vec<ScriptParam>) {
        let name = self.next_name();
        let step = Step::hive(name, self.layout.script_uri(script), params);
        self.steps.push(step);
    }

    /// Steps para armar el diccionario de un idioma y exportarlo:
    /// import, ventana inicial, un corrimiento por año y export.
    pub fn dictionary(
        &mut self,
        ngrams_location: &str,
        table: &str,
        window: &YearWindow,
        percent_of_years: f64,
    ) -> &mut Self {
        self.push(
            HiveScript::ImportNgrams,
            vec![
                ScriptParam::new("ngramsLocation", ngrams_location),
                ScriptParam::new("regex", GRAM_REGEX),
                ScriptParam::new("ngramsTable", table),
            ],
        );

        self.push(
            HiveScript::CreateWindow,
            vec![
                ScriptParam::new("ngramsTable", table),
                ScriptParam::new("fromYear", window.from_year),
                ScriptParam::new("toYear", window.first_window_end()),
            ],
        );

        for year in window.shift_years() {
            self.push(
                HiveScript::ShiftWindow,
                vec![
                    ScriptParam::new("ngramsTable", table),
                    ScriptParam::new("newYear", year),
                    ScriptParam::new("windowSize", window.window_size),
                ],
            );
        }

        let output = self.layout.dictionary_output(table);
        self.push(
            HiveScript::ExportDictionary,
            vec![
                ScriptParam::new("ngramsTable", table),
                ScriptParam::new("windowSize", window.window_size),
                ScriptParam::new("percentOfYears", format_ratio(percent_of_years)),
                ScriptParam::new("output", output),
            ],
        );

        self
    }

    /// Compara los diccionarios de dos idiomas; la salida queda bajo `table1`.
    pub fn foreignisms(&mut self, table1: &str, table2: &str) -> &mut Self {
        let output = self.layout.foreignisms_output(table1, table2);
        self.push(
            HiveScript::ExportForeignisms,
            vec![
                ScriptParam::new("ngramsTable1", table1),
                ScriptParam::new("ngramsTable2", table2),
                ScriptParam::new("output", output),
            ],
        );
        self
    }

    /// Un step por año con los neologismos de ese año, y un export final.
    pub fn neologisms(&mut self, table: &str, window: &YearWindow) -> &mut Self {
        for year in window.shift_years() {
            self.push(
                HiveScript::ProcessNeologisms,
                vec![
                    ScriptParam::new("ngramsTable", table),
                    ScriptParam::new("year", year),
                ],
            );
        }

        let output = self.layout.neologisms_output(table);
        self.push(
            HiveScript::ExportNeologisms,
            vec![
                ScriptParam::new("ngramsTable", table),
                ScriptParam::new("output", output),
            ],
        );
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn finish(self) -> Result<Vec<Step>, PlanError> {
        if self.steps.len() > MAX_STEPS {
            return Err(PlanError::TooManySteps {
                count: self.steps.len(),
                max: MAX_STEPS,
            });
        }
        Ok(self.steps)
    }
}

/// Lista completa de steps de una corrida:
/// diccionario(idioma1) [+ diccionario(idioma2) + extranjerismos] + neologismos(idioma1).
pub fn plan_steps(
    layout: &RunLayout,
    corpus: &Corpus,
    params: &RunParameters,
    window: &YearWindow,
) -> Result<Vec<Step>, PlanError> {
    let table1 = params.table1();
    let mut builder = StepSequenceBuilder::new(layout);

    builder.dictionary(
        &corpus.location(&params.language1),
        &table1,
        window,
        params.percent_of_years,
    );

    if params.compares_languages() {
        let table2 = params.table2();
        builder
            .dictionary(
                &corpus.location(&params.language2),
                &table2,
                window,
                params.percent_of_years,
            )
            .foreignisms(&table1, &table2);
    }

    builder.neologisms(&table1, window);
    builder.finish()
}

/// Siempre con al menos un decimal: 1.0 -> "1.0", 0.8 -> "0.8".
pub fn format_ratio(ratio: f64) -> String {
    format!("{:?}", ratio)
}
