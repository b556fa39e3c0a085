use base64::Engine;
use mongodb::bson::{oid::ObjectId, spec::BinarySubtype, Binary};
use serde::{Deserialize, Serialize};

/// Student enrolled through the registration form, stored in `<students db>.users`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Student {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: Option<String>,
    #[serde(rename = "rollNo")]
    pub roll_no: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub image: Option<Binary>,
}

impl Student {
    pub fn new(form: StudentForm) -> Self {
        Self {
            id: None,
            name: form.name,
            roll_no: form.roll_no,
            phone: form.phone,
            image: form.image.map(|bytes| Binary {
                subtype: BinarySubtype::Generic,
                bytes,
            }),
        }
    }
}

/// Fields collected from the multipart registration body.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StudentForm {
    pub name: Option<String>,
    pub roll_no: Option<String>,
    pub phone: Option<String>,
    pub image: Option<Vec<u8>>,
}

/// Student as returned by the listing endpoint; the photo is base-64 encoded.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct StudentSummary {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "rollNo")]
    pub roll_no: Option<String>,
    pub phone: Option<String>,
    pub image: Option<String>,
}

impl From<Student> for StudentSummary {
    fn from(student: Student) -> Self {
        Self {
            id: student.id.map(|oid| oid.to_hex()),
            name: student.name,
            roll_no: student.roll_no,
            phone: student.phone,
            image: student
                .image
                .map(|binary| base64::engine::general_purpose::STANDARD.encode(binary.bytes)),
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct DeleteStudentRequest {
    pub name: Option<String>,
}
