use crate::export::ExportOutput;
#[cfg(target_arch = "wasm32")]
use crate::export::ExportError;
use crate::export::ExportResult;

/// Hand a finished export to the user. Natively the file is written into
/// `dir`; returns where it went.
#[cfg(not(target_arch = "wasm32"))]
pub fn deliver(output: &ExportOutput, dir: &std::path::Path) -> ExportResult<String> {
    let path = output.write_to(dir)?;
    Ok(path.display().to_string())
}

/// Hand a finished export to the user as a browser download
#[cfg(target_arch = "wasm32")]
pub fn deliver(output: &ExportOutput) -> ExportResult<String> {
    use wasm_bindgen::JsCast;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| browser_error("no document"))?;
    let anchor = document
        .create_element("a")
        .map_err(|_| browser_error("could not create link"))?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| browser_error("not an anchor"))?;
    anchor.set_href(&crate::element::media::to_data_url(output.mime, &output.bytes));
    anchor.set_download(&output.file_name);
    anchor.click();
    Ok(output.file_name.clone())
}

#[cfg(target_arch = "wasm32")]
fn browser_error(reason: &str) -> ExportError {
    ExportError::Io(std::io::Error::other(format!("download failed: {reason}")))
}
