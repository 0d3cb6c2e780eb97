//! Live Office automation backend via COM late binding (IDispatch).
//!
//! Each application is reached through its registered ProgID and driven
//! with name-resolved Invoke calls, the same calls the original VBA/interop
//! surface exposes. Windows only.

use crate::error::{Error, Result};
use crate::model::{Family, SaveFormat};
use crate::office::{Document, Session, Suite, CURRENT_COMPATIBILITY};
use std::ffi::OsStr;
use std::iter::once;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;
use std::ptr;
use winapi::shared::guiddef::{CLSID, IID};
use winapi::shared::wtypes::{VARIANT_BOOL, VT_BOOL, VT_BSTR, VT_DISPATCH, VT_I2, VT_I4};
use winapi::shared::wtypesbase::CLSCTX_LOCAL_SERVER;
use winapi::um::combaseapi::{CLSIDFromProgID, CoCreateInstance, CoInitializeEx};
use winapi::um::oaidl::{IDispatch, DISPPARAMS, VARIANT};
use winapi::um::objbase::COINIT_APARTMENTTHREADED;
use winapi::um::oleauto::{SysAllocString, VariantClear, VariantInit};
use winapi::Interface;

// oleauto.h dispatch constants.
const LOCALE_USER_DEFAULT: u32 = 0x0400;
const DISPATCH_METHOD: u16 = 0x1;
const DISPATCH_PROPERTYGET: u16 = 0x2;
const DISPATCH_PROPERTYPUT: u16 = 0x4;
const DISPID_PROPERTYPUT: i32 = -3;

const VARIANT_TRUE: VARIANT_BOOL = -1;
const VARIANT_FALSE: VARIANT_BOOL = 0;

fn to_wide(s: &str) -> Vec<u16> {
    OsStr::new(s).encode_wide().chain(once(0)).collect()
}

fn check(hr: i32, what: &str) -> Result<()> {
    if hr < 0 {
        Err(Error::Automation(format!(
            "{} failed with HRESULT 0x{:08X}",
            what, hr as u32
        )))
    } else {
        Ok(())
    }
}

/// Owned VARIANT that clears itself on drop.
struct Variant(VARIANT);

impl Variant {
    fn empty() -> Self {
        unsafe {
            let mut v: VARIANT = std::mem::zeroed();
            VariantInit(&mut v);
            Variant(v)
        }
    }

    fn from_str(s: &str) -> Self {
        let mut v = Variant::empty();
        let wide = to_wide(s);
        unsafe {
            let n2 = v.0.n1.n2_mut();
            n2.vt = VT_BSTR as u16;
            *n2.n3.bstrVal_mut() = SysAllocString(wide.as_ptr());
        }
        v
    }

    fn from_i32(n: i32) -> Self {
        let mut v = Variant::empty();
        unsafe {
            let n2 = v.0.n1.n2_mut();
            n2.vt = VT_I4 as u16;
            *n2.n3.lVal_mut() = n;
        }
        v
    }

    fn from_bool(b: bool) -> Self {
        let mut v = Variant::empty();
        unsafe {
            let n2 = v.0.n1.n2_mut();
            n2.vt = VT_BOOL as u16;
            *n2.n3.boolVal_mut() = if b { VARIANT_TRUE } else { VARIANT_FALSE };
        }
        v
    }

    fn vt(&self) -> u16 {
        unsafe { self.0.n1.n2().vt }
    }

    fn as_i32(&self) -> Result<i32> {
        unsafe {
            let n2 = self.0.n1.n2();
            match n2.vt as u32 {
                VT_I4 => Ok(*n2.n3.lVal()),
                VT_I2 => Ok(*n2.n3.iVal() as i32),
                other => Err(Error::Automation(format!(
                    "expected an integer result, got VT {}",
                    other
                ))),
            }
        }
    }

    fn as_bool(&self) -> Result<bool> {
        unsafe {
            let n2 = self.0.n1.n2();
            if n2.vt as u32 == VT_BOOL {
                Ok(*n2.n3.boolVal() != VARIANT_FALSE)
            } else {
                Err(Error::Automation(format!(
                    "expected a boolean result, got VT {}",
                    n2.vt
                )))
            }
        }
    }

    /// Takes ownership of a dispatch result; the returned object now holds
    /// the reference this variant carried.
    fn into_object(self) -> Result<ComObject> {
        if self.vt() as u32 != VT_DISPATCH {
            return Err(Error::Automation(format!(
                "expected an object result, got VT {}",
                self.vt()
            )));
        }
        unsafe {
            let disp = *self.0.n1.n2().n3.pdispVal();
            if disp.is_null() {
                return Err(Error::Automation("endpoint returned a null object".into()));
            }
            std::mem::forget(self); // the reference moves to ComObject
            Ok(ComObject(disp))
        }
    }
}

impl Drop for Variant {
    fn drop(&mut self) {
        unsafe {
            VariantClear(&mut self.0);
        }
    }
}

/// One IDispatch reference, released on drop.
struct ComObject(*mut IDispatch);

impl ComObject {
    fn create(prog_id: &str) -> Result<Self> {
        unsafe {
            // Repeat calls on an already-initialized apartment return S_FALSE,
            // which is fine.
            check(
                CoInitializeEx(ptr::null_mut(), COINIT_APARTMENTTHREADED),
                "CoInitializeEx",
            )?;

            let wide = to_wide(prog_id);
            let mut clsid: CLSID = std::mem::zeroed();
            check(CLSIDFromProgID(wide.as_ptr(), &mut clsid), prog_id)?;

            let mut disp: *mut IDispatch = ptr::null_mut();
            check(
                CoCreateInstance(
                    &clsid,
                    ptr::null_mut(),
                    CLSCTX_LOCAL_SERVER,
                    &IDispatch::uuidof(),
                    &mut disp as *mut *mut IDispatch as *mut _,
                ),
                prog_id,
            )?;
            Ok(ComObject(disp))
        }
    }

    fn dispid(&self, name: &str) -> Result<i32> {
        unsafe {
            let iid_null: IID = std::mem::zeroed();
            let wide = to_wide(name);
            let mut name_ptr = wide.as_ptr() as *mut u16;
            let mut dispid: i32 = 0;
            check(
                (*self.0).GetIDsOfNames(
                    &iid_null,
                    &mut name_ptr,
                    1,
                    LOCALE_USER_DEFAULT,
                    &mut dispid,
                ),
                name,
            )?;
            Ok(dispid)
        }
    }

    fn invoke(&self, flags: u16, name: &str, args: &mut [Variant]) -> Result<Variant> {
        let dispid = self.dispid(name)?;
        unsafe {
            // IDispatch wants arguments in reverse order.
            let mut rgvarg: Vec<VARIANT> = args.iter().rev().map(|v| v.0).collect();
            let mut named_put: i32 = DISPID_PROPERTYPUT;
            let is_put = flags & DISPATCH_PROPERTYPUT != 0;
            let mut params = DISPPARAMS {
                rgvarg: rgvarg.as_mut_ptr(),
                rgdispidNamedArgs: if is_put { &mut named_put } else { ptr::null_mut() },
                cArgs: rgvarg.len() as u32,
                cNamedArgs: if is_put { 1 } else { 0 },
            };
            let mut result = Variant::empty();
            let iid_null: IID = std::mem::zeroed();
            check(
                (*self.0).Invoke(
                    dispid,
                    &iid_null,
                    LOCALE_USER_DEFAULT,
                    flags,
                    &mut params,
                    &mut result.0,
                    ptr::null_mut(),
                    ptr::null_mut(),
                ),
                name,
            )?;
            Ok(result)
        }
    }

    fn call(&self, name: &str, args: &mut [Variant]) -> Result<Variant> {
        self.invoke(DISPATCH_METHOD, name, args)
    }

    fn get(&self, name: &str) -> Result<Variant> {
        self.invoke(DISPATCH_PROPERTYGET, name, &mut [])
    }

    fn get_object(&self, name: &str) -> Result<ComObject> {
        self.get(name)?.into_object()
    }

    fn put(&self, name: &str, value: Variant) -> Result<()> {
        self.invoke(DISPATCH_PROPERTYPUT, name, &mut [value])?;
        Ok(())
    }
}

impl Drop for ComObject {
    fn drop(&mut self) {
        unsafe {
            (*self.0).Release();
        }
    }
}

// A couple of window-state constants from the interop enums.
const WD_WINDOW_STATE_MINIMIZE: i32 = 2;
const WD_ALERTS_NONE: i32 = 0;
const XL_MINIMIZED: i32 = -4140;
const PP_WINDOW_MINIMIZED: i32 = 2;
const MSO_TRUE: i32 = -1;
const MSO_FALSE: i32 = 0;

fn prog_id(family: Family) -> &'static str {
    match family {
        Family::Word => "Word.Application",
        Family::Excel => "Excel.Application",
        Family::PowerPoint => "PowerPoint.Application",
    }
}

/// Suppress every interactive prompt we can and run minimized. Visible
/// rather than hidden: it saves a lot of headache if the user can still
/// interact with a stuck dialog.
fn configure_app(app: &ComObject, family: Family) -> Result<()> {
    match family {
        Family::Word => {
            let options = app.get_object("Options")?;
            options.put("UpdateLinksAtOpen", Variant::from_bool(false))?;
            app.put("WindowState", Variant::from_i32(WD_WINDOW_STATE_MINIMIZE))?;
            app.put("DisplayAlerts", Variant::from_i32(WD_ALERTS_NONE))?;
            app.put("Visible", Variant::from_bool(true))?;
        }
        Family::Excel => {
            app.put("WindowState", Variant::from_i32(XL_MINIMIZED))?;
            app.put("AskToUpdateLinks", Variant::from_bool(false))?;
            app.put("Visible", Variant::from_bool(true))?;
        }
        Family::PowerPoint => {
            app.put("WindowState", Variant::from_i32(PP_WINDOW_MINIMIZED))?;
            app.put("Visible", Variant::from_i32(MSO_TRUE))?;
        }
    }
    Ok(())
}

pub struct ComSuite;

impl Suite for ComSuite {
    fn start(&self, family: Family) -> Result<Box<dyn Session>> {
        let app = ComObject::create(prog_id(family)).map_err(|_| Error::NotInstalled(family))?;
        configure_app(&app, family).map_err(|_| Error::NotInstalled(family))?;
        Ok(Box::new(ComSession { app, family }))
    }
}

struct ComSession {
    app: ComObject,
    family: Family,
}

impl Session for ComSession {
    fn open(&mut self, path: &Path) -> Result<Box<dyn Document>> {
        let path_str = path.to_string_lossy();
        let doc = match self.family {
            Family::Word => {
                let documents = self.app.get_object("Documents")?;
                documents
                    .call("Open", &mut [Variant::from_str(&path_str)])?
                    .into_object()?
            }
            Family::Excel => {
                let workbooks = self.app.get_object("Workbooks")?;
                workbooks
                    .call("Open", &mut [Variant::from_str(&path_str)])?
                    .into_object()?
            }
            Family::PowerPoint => {
                // Open(FileName, ReadOnly, Untitled, WithWindow)
                let presentations = self.app.get_object("Presentations")?;
                presentations
                    .call(
                        "Open",
                        &mut [
                            Variant::from_str(&path_str),
                            Variant::from_i32(MSO_TRUE),
                            Variant::from_i32(MSO_FALSE),
                            Variant::from_i32(MSO_FALSE),
                        ],
                    )?
                    .into_object()?
            }
        };
        Ok(Box::new(ComDocument {
            obj: doc,
            family: self.family,
        }))
    }

    fn quit(&mut self) {
        let _ = match self.family {
            Family::Word => self.app.call("Quit", &mut [Variant::from_bool(false)]),
            Family::Excel | Family::PowerPoint => self.app.call("Quit", &mut []),
        };
    }
}

struct ComDocument {
    obj: ComObject,
    family: Family,
}

impl Document for ComDocument {
    fn compatibility_mode(&self) -> i32 {
        match self.family {
            Family::Word => self
                .obj
                .get("CompatibilityMode")
                .and_then(|v| v.as_i32())
                .unwrap_or(0),
            Family::Excel => match self
                .obj
                .get("Excel8CompatibilityMode")
                .and_then(|v| v.as_bool())
            {
                Ok(true) => 8,
                Ok(false) => CURRENT_COMPATIBILITY,
                // An unreadable flag counts as legacy; worst case is a
                // harmless re-save.
                Err(_) => 8,
            },
            Family::PowerPoint => 0,
        }
    }

    fn has_macros(&self) -> bool {
        self.obj
            .get("HasVBProject")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    fn save_as(&mut self, target: &Path, format: SaveFormat) -> Result<()> {
        let target_str = target.to_string_lossy();
        let method = match self.family {
            Family::Word => "SaveAs2",
            Family::Excel | Family::PowerPoint => "SaveAs",
        };
        self.obj.call(
            method,
            &mut [
                Variant::from_str(&target_str),
                Variant::from_i32(format.com_code()),
            ],
        )?;
        Ok(())
    }

    fn normalize_to_current(&mut self) -> Result<()> {
        if self.family == Family::Word {
            // Word saves in compatibility mode by default; Convert forces
            // the document up to the current version.
            self.obj.call("Convert", &mut [])?;
            self.obj.call("Save", &mut [])?;
        }
        Ok(())
    }

    fn close(&mut self, save_changes: bool) -> Result<()> {
        match self.family {
            Family::Word | Family::Excel => {
                self.obj
                    .call("Close", &mut [Variant::from_bool(save_changes)])?;
            }
            Family::PowerPoint => {
                self.obj.call("Close", &mut [])?;
            }
        }
        Ok(())
    }
}
