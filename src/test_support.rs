// Builders for unit tests.
use crate::types::Project;

pub fn project(id: i64, region: &str, fecha: &str) -> Project {
    Project {
        id,
        id_expediente: id * 100,
        nombre: format!("Proyecto {}", id),
        tipo: "DIA".to_string(),
        region: region.to_string(),
        tipologia: "a1".to_string(),
        titular: "Titular".to_string(),
        sub_tipologia: None,
        inversion: "0,00".to_string(),
        fecha: fecha.to_string(),
        fecha_termino: None,
        estado: "En Admisión".to_string(),
        dias_evaluacion: None,
        dias_suspension: None,
        potencia: None,
        comuna: None,
        x: None,
        y: None,
        validado: None,
        cant_relacionados: None,
        fecha_resolucion: None,
        nro_resolucion: None,
        descripcion_detalle: None,
        encargado_detalle: None,
    }
}

pub trait ProjectExt {
    fn tipo(self, tipo: &str) -> Self;
    fn approved(self) -> Self;
    fn estado(self, estado: &str) -> Self;
    fn inversion(self, inversion: &str) -> Self;
    fn resolved_on(self, fecha: &str) -> Self;
}

impl ProjectExt for Project {
    fn tipo(mut self, tipo: &str) -> Self {
        self.tipo = tipo.to_string();
        self
    }

    fn approved(self) -> Self {
        self.estado(crate::types::APPROVED)
    }

    fn estado(mut self, estado: &str) -> Self {
        self.estado = estado.to_string();
        self
    }

    fn inversion(mut self, inversion: &str) -> Self {
        self.inversion = inversion.to_string();
        self
    }

    fn resolved_on(mut self, fecha: &str) -> Self {
        self.fecha_resolucion = Some(fecha.to_string());
        self
    }
}
