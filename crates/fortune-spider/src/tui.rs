use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bars of a running stage: totals, successes, failures, and a spinner naming the
/// entity being processed.
pub(crate) struct Bars {
    multi: MultiProgress,
    pub(crate) total: ProgressBar,
    pub(crate) success: ProgressBar,
    pub(crate) fails: ProgressBar,
    pub(crate) spinner: ProgressBar,
}

impl Bars {
    /// Print above the bars, without tearing them.
    pub(crate) fn println(&self, msg: impl AsRef<str>) {
        if self.multi.println(msg.as_ref()).is_err() {
            println!("{}", msg.as_ref());
        }
    }

    pub(crate) fn succeed(&self) {
        self.success.inc(1);
        self.total.inc(1);
    }

    pub(crate) fn fail(&self) {
        self.fails.inc(1);
        self.total.inc(1);
    }

    pub(crate) fn finish(&self) {
        self.spinner.finish_and_clear();
        self.fails.finish_and_clear();
        self.success.finish_and_clear();
        self.total.finish_and_clear();
    }
}

pub(crate) fn multi_progress(len: usize) -> anyhow::Result<Bars> {
    // overall multi progress bar
    let multi = MultiProgress::new();

    // total number of companies to collect
    let total = multi.add(
        ProgressBar::new(len as u64).with_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.magenta}\n \
                        {msg:>9.white} |{bar:57.white/grey}| {pos:<2} / {human_len} \
                        ({percent_precise}%) [Time: {elapsed}, Rate: {per_sec}, ETA: {eta}]",
                )?
                .progress_chars("## "),
        ),
    );
    total.set_message("total");
    total.enable_steady_tick(Duration::from_millis(100));

    // total successful collections
    let success = multi.insert_after(
        &total,
        ProgressBar::new(len as u64).with_style(
            ProgressStyle::default_bar()
                .template(" {msg:>9.green} |{bar:57.green}| {pos:<2.green}")?
                .progress_chars("## "),
        ),
    );
    success.set_message("successes");

    // total failed collections
    let fails = multi.insert_after(
        &success,
        ProgressBar::new(len as u64).with_style(
            ProgressStyle::default_bar()
                .template(" {msg:>9.red} |{bar:57.red}| {pos:<2.red}")?
                .progress_chars("## "),
        ),
    );
    fails.set_message("failures");

    let spinner = multi_progress_spinner(&multi, "preparing ...".to_string())?;
    spinner.enable_steady_tick(Duration::from_millis(50));

    Ok(Bars {
        multi,
        total,
        success,
        fails,
        spinner,
    })
}

fn multi_progress_spinner(multi: &MultiProgress, msg: String) -> anyhow::Result<ProgressBar> {
    Ok(multi.add(
        ProgressBar::new_spinner()
            .with_message(msg)
            .with_style(ProgressStyle::default_spinner().template("\t   > {msg}")?),
    ))
}

/// Stage header, e.g.
///
/// ```text
/// ========================================
///               SEC Metrics
/// ========================================
/// ```
pub(crate) fn banner(name: &str) -> String {
    format!(
        "{bar}\n{name}\n{bar}",
        bar = "=".repeat(40),
        name = format!("{name:^40}").bold()
    )
}
