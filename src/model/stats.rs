/// Counters for a single run.
#[derive(Debug, Default)]
pub struct Stats {
    n_transactions: usize,
    n_details: usize,
    n_skipped: usize,
}

impl Stats {
    pub fn add_transactions(&mut self, count: usize) {
        self.n_transactions += count;
    }

    pub fn inc_details(&mut self) {
        self.n_details += 1;
    }

    pub fn inc_skipped(&mut self) {
        self.n_skipped += 1;
    }

    pub fn transactions(&self) -> usize {
        self.n_transactions
    }

    pub fn details(&self) -> usize {
        self.n_details
    }

    pub fn skipped(&self) -> usize {
        self.n_skipped
    }

    pub fn pretty_print(&self) {
        println!("{self:#?}");
        println!();
    }
}
