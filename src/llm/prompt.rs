//! Prompt construction for natural language to SQL.
//!
//! The template is fixed: it describes the single STUDENT table, shows two
//! worked examples and asks for bare SQL. The question is inserted as plain
//! text. Nothing is escaped, so a question can steer the instructions as much
//! as it likes; the prompt is not a security boundary.

/// Table the prompt describes to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    /// Table name as it appears in SQL
    pub name: &'static str,

    /// Column names in declaration order
    pub columns: &'static [&'static str],
}

/// The STUDENT table of the bundled database.
pub const STUDENT_TABLE: TableSchema = TableSchema {
    name: "STUDENT",
    columns: &["NAME", "COURSE", "SECTION", "MARKS"],
};

impl TableSchema {
    /// Human-readable column list: `NAME, COURSE, SECTION and MARKS`.
    pub fn column_list(&self) -> String {
        match self.columns.split_last() {
            None => String::new(),
            Some((last, [])) => last.to_string(),
            Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
        }
    }
}

/// Builds the completion prompt for a question.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    table: TableSchema,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self { table: STUDENT_TABLE }
    }
}

impl PromptBuilder {
    /// Create a builder for the STUDENT table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table described by the prompt.
    pub fn table(&self) -> &TableSchema {
        &self.table
    }

    /// Fill the template with `question`.
    ///
    /// # Arguments
    ///
    /// * `question` - Raw user question, inserted verbatim
    ///
    /// # Returns
    ///
    /// The full prompt text
    pub fn build(&self, question: &str) -> String {
        let table = self.table.name;
        format!(
            r#"You are an expert in converting English questions to SQL queries!
The SQL database has a table named {table} with the following columns - {columns}.
For example,
Example 1 - How many entries of records are present?
    the SQL command will be something like this SELECT COUNT(*) FROM {table};
Example 2 - Tell me all the students studying in Data Science COURSE?
    the SQL command will be something like this SELECT * FROM {table} where COURSE="Data Science";
Also the SQL code should not have ``` in the beginning or end and should not include the word sql.
Now convert the following question in English to a valid SQL query: {question}
No preamble, only valid SQL please."#,
            table = table,
            columns = self.table.column_list(),
            question = question,
        )
    }
}

/// Build the STUDENT prompt for `question`.
pub fn build_prompt(question: &str) -> String {
    PromptBuilder::default().build(question)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_question_and_schema() {
        let prompt = build_prompt("Which students scored above 80?");
        assert!(prompt.contains("Which students scored above 80?"));
        assert!(prompt.contains("STUDENT"));
        assert!(prompt.contains("NAME, COURSE, SECTION and MARKS"));
        assert!(prompt.contains("SELECT COUNT(*) FROM STUDENT;"));
        assert!(prompt.contains(r#"COURSE="Data Science""#));
    }

    #[test]
    fn test_prompt_is_pure() {
        assert_eq!(build_prompt("count rows"), build_prompt("count rows"));
    }

    #[test]
    fn test_question_inserted_without_escaping() {
        let question = r#"students named O'Brien"; DROP TABLE STUDENT; --"#;
        let prompt = build_prompt(question);
        assert!(prompt.contains(question));
    }

    #[test]
    fn test_column_list() {
        assert_eq!(STUDENT_TABLE.column_list(), "NAME, COURSE, SECTION and MARKS");
        let single = TableSchema { name: "T", columns: &["ID"] };
        assert_eq!(single.column_list(), "ID");
    }
}
