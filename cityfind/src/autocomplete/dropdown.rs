#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DropdownOption {
    value: String,
    label: String,
}

impl DropdownOption {
    // NOTE: value and label are both the suggested text
    pub fn new(value: String) -> Self {
        let label = value.clone();

        Self { value, label }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// The suggestion list. Options are kept in insertion order and duplicates are allowed.
#[derive(Debug, Default)]
pub struct Dropdown {
    options: Vec<DropdownOption>,
    selected_index: Option<usize>,
}

impl Dropdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.options.clear();
        self.selected_index = None;
    }

    pub fn append(&mut self, option: DropdownOption) {
        self.options.push(option);
    }

    pub fn options(&self) -> &[DropdownOption] {
        &self.options
    }

    pub fn values(&self) -> impl '_ + Iterator<Item = &str> {
        self.options.iter().map(DropdownOption::value)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn selected(&self) -> Option<&DropdownOption> {
        self.options.get(self.selected_index?)
    }

    pub fn select_next(&mut self) {
        if self.options.is_empty() {
            return;
        }

        self.selected_index = match self.selected_index {
            Some(index) => (index + 1).min(self.options.len() - 1),
            None => 0,
        }
        .into();
    }

    pub fn select_previous(&mut self) {
        self.selected_index = match self.selected_index {
            Some(0) | None => None,
            Some(index) => Some(index - 1),
        };
    }
}
