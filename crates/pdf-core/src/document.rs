//! Single-page PDF document built around one raster image

use crate::image::{generate_image_operators, ImageXObject};
use crate::page::{PageSize, PageSizing, Placement};
use crate::{PdfError, Result};
use ::image::RgbImage;
use lopdf::{dictionary, Document, Object, Stream};
use std::path::Path;

/// Resource name of the page image
const IMAGE_RESOURCE: &str = "Im1";

/// PDF Document holding one page whose sole content is an image
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
    /// Where the image sits on the page
    placement: Placement,
}

impl PdfDocument {
    /// Build a one-page document from an RGB raster
    ///
    /// # Arguments
    /// * `image` - Filled form raster
    /// * `sizing` - Page sizing strategy
    ///
    /// # Example
    /// ```ignore
    /// let mut doc = PdfDocument::from_image(&filled, PageSizing::fixed(PageSize::A4))?;
    /// let bytes = doc.to_bytes()?;
    /// ```
    pub fn from_image(image: &RgbImage, sizing: PageSizing) -> Result<Self> {
        let placement = sizing.place(image.width(), image.height())?;
        let xobject = ImageXObject::from_rgb(image)?;

        let mut inner = Document::with_version("1.5");
        let pages_id = inner.new_object_id();

        let image_id = inner.add_object(xobject.to_pdf_stream());

        let operators = generate_image_operators(
            IMAGE_RESOURCE,
            placement.x,
            placement.y,
            placement.width,
            placement.height,
        );
        let contents_id = inner.add_object(Stream::new(dictionary! {}, operators));

        let page_id = inner.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(placement.page.width as _),
                Object::Real(placement.page.height as _),
            ],
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    IMAGE_RESOURCE => image_id,
                },
            },
            "Contents" => contents_id,
        });

        inner.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );

        let catalog_id = inner.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        inner.trailer.set("Root", catalog_id);

        Ok(Self { inner, placement })
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.inner.get_pages().len()
    }

    /// Page (MediaBox) size in points
    pub fn page_size(&self) -> PageSize {
        self.placement.page
    }

    /// Image rectangle on the page
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Save the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(buffer)
    }

    /// Save the document to a file
    ///
    /// The document is serialized in memory first, so a serialization
    /// failure never touches the filesystem. If the write itself fails,
    /// any partially written file is removed.
    ///
    /// # Arguments
    /// * `path` - Output file path
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;

        if let Err(err) = std::fs::write(path, &bytes) {
            let _ = std::fs::remove_file(path);
            return Err(PdfError::IoError(err));
        }
        Ok(())
    }

    /// Get a reference to the underlying lopdf document
    pub fn inner(&self) -> &Document {
        &self.inner
    }
}
