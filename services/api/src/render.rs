use clap::Args;
use clinic_forms::config::AppConfig;
use clinic_forms::error::AppError;
use clinic_forms::forms::consent::{
    ConsentFormError, ConsentFormSubmission, ConsentLayout, ConsentPdfRenderer,
    DocumentTemplateStore, FsTemplateStore, RenderedDocument,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct RenderConsentArgs {
    /// JSON file holding a consent form submission
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Where to write the filled PDF
    #[arg(long)]
    pub(crate) output: PathBuf,
}

pub(crate) fn run_render(args: RenderConsentArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let templates = FsTemplateStore::from_config(&config.template);

    let document = render_file(&templates, &args.input)?;
    fs::write(&args.output, &document.bytes)?;

    println!("Consent form written to {}", args.output.display());
    println!("  Pages:      {}", document.page_count);
    println!("  Attachment: {}", document.filename);
    Ok(())
}

fn render_file<T: DocumentTemplateStore>(
    templates: &T,
    input: &Path,
) -> Result<RenderedDocument, AppError> {
    let raw = fs::read(input)?;
    let submission: ConsentFormSubmission = serde_json::from_slice(&raw)?;
    Ok(render_submission(templates, &submission)?)
}

fn render_submission<T: DocumentTemplateStore>(
    templates: &T,
    submission: &ConsentFormSubmission,
) -> Result<RenderedDocument, ConsentFormError> {
    submission.validate()?;
    let template = templates.load()?;
    let renderer = ConsentPdfRenderer::new(ConsentLayout::standard());
    Ok(renderer.render(&template, submission)?)
}
