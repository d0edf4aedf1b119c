//! Python package installation through pip

use crate::error::Result;
use crate::layout::ProjectLayout;
use crate::runner::{quote, CommandRunner};
use kiln_core::PackagesConfig;
use tracing::{debug, info};

/// Installs packages with the project's interpreter.
///
/// Once a virtualenv exists (or was just created) every pip call goes
/// through the virtualenv interpreter.
pub struct PackageInstaller<'a> {
    runner: &'a dyn CommandRunner,
    layout: &'a ProjectLayout,
    python: String,
    use_virtualenv: bool,
}

impl<'a> PackageInstaller<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        layout: &'a ProjectLayout,
        config: &PackagesConfig,
    ) -> Self {
        let python = if config.virtualenv && layout.venv_python().exists() {
            layout.venv_python().to_string()
        } else {
            config.python.clone()
        };

        Self {
            runner,
            layout,
            python,
            use_virtualenv: config.virtualenv,
        }
    }

    /// Interpreter pip is invoked with
    pub fn python(&self) -> &str {
        &self.python
    }

    /// Create `venv/` when virtualenvs are enabled and it does not exist yet
    pub fn create_virtualenv(&mut self) -> Result<()> {
        if !self.use_virtualenv {
            debug!("Virtualenv disabled, using {}", self.python);
            return Ok(());
        }

        if !self.layout.venv_dir().exists() {
            info!("Setting up virtual environment...");
            self.runner.run(
                &format!("{} -m venv venv", quote(&self.python)),
                self.layout.root(),
            )?;
        }

        self.python = self.layout.venv_python().to_string();
        info!("Virtual environment ready: {}", self.python);
        Ok(())
    }

    /// `pip install` the given packages
    pub fn install(&self, packages: &[&str]) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }

        info!("Installing {}...", packages.join(", "));
        let args: Vec<_> = packages.iter().map(|p| quote(p)).collect();
        self.pip(&format!("install {}", args.join(" ")))?;
        Ok(())
    }

    /// Install `requirements.txt` and the pre-commit tool
    pub fn install_requirements(&self) -> Result<()> {
        if self.layout.requirements().exists() {
            info!("Installing requirements...");
            self.pip("install -r requirements.txt")?;
        } else {
            debug!("No requirements.txt found, skipping");
        }

        info!("Installing pre-commit...");
        self.pip("install pre-commit")?;
        Ok(())
    }

    /// Pin the installed set into `requirements.txt` and install the git hooks
    pub fn freeze_requirements(&self) -> Result<()> {
        let frozen = self.pip("freeze")?;
        std::fs::write(self.layout.requirements(), frozen)?;

        self.runner
            .run("pre-commit install --install-hooks", self.layout.root())?;

        info!("Requirements updated and pre-commit hooks installed.");
        Ok(())
    }

    fn pip(&self, args: &str) -> Result<String> {
        self.runner.run(
            &format!("{} -m pip {}", quote(&self.python), args),
            self.layout.root(),
        )
    }
}
